/// Pure game rules: entities, field geometry, cat behavior.

pub mod ai;
pub mod entity;
pub mod physics;
