/// The step functions: one gameplay tick per directional input, and a
/// separate animation pass on a fixed timer.
///
/// Tick processing order:
///   1. Move the dog
///   2. For each active cat, in spawn order:
///      a. proximity check → flee one step or rest
///      b. a cat that moved is tested against the goal, then the traps
///      c. capture: score, park off-field, count it gone
///   3. Edge-triggered level end: score < 0 (game over) or every cat gone
///
/// A tick runs to completion before the next input is read. Animation only
/// touches frame counters, so the two never disagree about positions.

use rand::Rng;

use crate::domain::ai::{self, Reaction};
use crate::domain::entity::MoveDir;
use crate::domain::physics;
use super::event::GameEvent;
use super::level;
use super::world::{Phase, WorldState};

pub const GOAL_POINTS: i32 = 2;
pub const TRAP_PENALTY: i32 = 1;

/// Where a captured cat is parked: right of the field, stacked by id.
pub fn parking_spot(world: &WorldState, id: usize) -> (i32, i32) {
    (world.field.size + 30, 100 + 50 * id as i32)
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn tick(world: &mut WorldState, dir: MoveDir, rng: &mut impl Rng) -> Vec<GameEvent> {
    if world.phase != Phase::Playing { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    let predator = match world.player.as_mut() {
        Some(p) => {
            physics::step_sprite(p, dir, &world.field);
            p.clone()
        }
        None => return events,
    };

    for idx in 0..world.cats.len() {
        if !world.cats[idx].active { continue; }

        let reaction = ai::react(&predator, &mut world.cats[idx], &world.field, rng);
        let fled = match reaction {
            Reaction::Fled(d) => d,
            Reaction::Rested => continue,
        };
        events.push(GameEvent::CatFled { id: world.cats[idx].id, dir: fled });

        match resolve_collision(world, idx) {
            Some(Hit::Goal) => {
                world.score += GOAL_POINTS;
                let id = world.cats[idx].id;
                tracing::debug!(cat = id, score = world.score, "cat herded into the box");
                events.push(GameEvent::CatCaptured { id });
                if capture(world, idx, &mut events) { return events; }
            }
            Some(Hit::Trap(trap)) => {
                world.score -= TRAP_PENALTY;
                let id = world.cats[idx].id;
                tracing::debug!(cat = id, trap, score = world.score, "cat caught in a trap");
                events.push(GameEvent::CatTrapped { id, trap });
                if world.score < 0 {
                    // Game over wins over any other outcome this tick.
                    world.cats[idx].active = false;
                    world.gone_cats += 1;
                    events.push(GameEvent::ScoreChanged { score: world.score });
                    events.push(GameEvent::GameOver { difficulty: world.difficulty });
                    level::clear_board(world);
                    return events;
                }
                if capture(world, idx, &mut events) { return events; }
            }
            None => {}
        }
    }

    events
}

/// Advance every live sprite's animation frame. Never moves anything.
pub fn animate(world: &mut WorldState) {
    for sprite in world.live_sprites_mut() {
        sprite.advance_frame();
    }
}

// ══════════════════════════════════════════════════════════════
// Collision / capture
// ══════════════════════════════════════════════════════════════

/// What a moved cat landed on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Hit {
    Goal,
    /// Index into `WorldState::traps`.
    Trap(usize),
}

/// Goal first, then traps in order; the first hit decides.
fn resolve_collision(world: &WorldState, idx: usize) -> Option<Hit> {
    let cat = &world.cats[idx];
    if let Some(goal) = &world.goal {
        if physics::collides(cat, goal, &world.field) {
            return Some(Hit::Goal);
        }
    }
    world
        .traps
        .iter()
        .position(|t| physics::collides(cat, t, &world.field))
        .map(Hit::Trap)
}

/// Remove a cat from play. Returns true if that emptied the level, in which
/// case the board has already been cleared.
fn capture(world: &mut WorldState, idx: usize, events: &mut Vec<GameEvent>) -> bool {
    let id = world.cats[idx].id;
    let (px, py) = parking_spot(world, id);
    let cat = &mut world.cats[idx];
    if !cat.active { return false; }
    cat.active = false;
    cat.x = px;
    cat.y = py;
    world.gone_cats += 1;
    events.push(GameEvent::ScoreChanged { score: world.score });

    if world.level_finished() {
        events.push(GameEvent::LevelCleared { difficulty: world.difficulty, score: world.score });
        level::clear_board(world);
        return true;
    }
    false
}
