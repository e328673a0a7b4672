/// Cat AI: proximity-triggered, imperfect fleeing.
///
/// A cat only reacts while the dog is within `proximity` on BOTH axes.
/// It then flees one step along a single axis, away from the dog:
///   - usually (70%) along the axis where the dog is closest,
///   - otherwise (30%) along the other axis.
/// Out of range it rests: facing changes, position never does.

use rand::Rng;

use crate::config::FieldConfig;
use super::entity::{Facing, MoveDir, Sprite};
use super::physics;

/// Chance of fleeing along the axis with the smaller offset.
pub const FLEE_SMALLER_AXIS_CHANCE: f64 = 0.7;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Axis {
    X,
    Y,
}

/// What a cat did in response to the dog this tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Reaction {
    Fled(MoveDir),
    Rested,
}

/// Is the predator close enough on both axes to spook the prey?
pub fn in_range(predator: &Sprite, prey: &Sprite, proximity: i32) -> bool {
    let dx = predator.x - prey.x;
    let dy = predator.y - prey.y;
    dx.abs() < proximity && dy.abs() < proximity
}

/// Pick the flee axis from the offsets and a uniform roll in `[0, 1)`.
/// Ties count X as the smaller axis.
pub fn choose_flee_axis(dx: i32, dy: i32, roll: f64) -> Axis {
    let (smaller, other) = if dx.abs() <= dy.abs() {
        (Axis::X, Axis::Y)
    } else {
        (Axis::Y, Axis::X)
    };
    if roll < FLEE_SMALLER_AXIS_CHANCE { smaller } else { other }
}

/// Direction along `axis` that moves away from a predator at offset (dx, dy).
pub fn flee_direction(axis: Axis, dx: i32, dy: i32) -> MoveDir {
    match axis {
        Axis::X => if dx > 0 { MoveDir::Left } else { MoveDir::Right },
        Axis::Y => if dy > 0 { MoveDir::Up } else { MoveDir::Down },
    }
}

/// Evaluate one cat against the dog and apply its reaction.
pub fn react(
    predator: &Sprite,
    prey: &mut Sprite,
    field: &FieldConfig,
    rng: &mut impl Rng,
) -> Reaction {
    if !in_range(predator, prey, field.proximity) {
        prey.facing = Facing::Rest;
        return Reaction::Rested;
    }

    let dx = predator.x - prey.x;
    let dy = predator.y - prey.y;
    let axis = choose_flee_axis(dx, dy, rng.gen::<f64>());
    let dir = flee_direction(axis, dx, dy);
    physics::step_sprite(prey, dir, field);
    Reaction::Fled(dir)
}
