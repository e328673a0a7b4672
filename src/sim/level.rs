/// Level lifecycle: setup, teardown and the yes/no transitions between them.
///
/// Setup places everything at once: the dog at its fixed start, then the
/// goal, `cats_per_level` cats and `difficulty` traps at independent uniform
/// positions in `[spawn_margin, size - spawn_margin)` on each axis. Spawns
/// may overlap each other; that is part of the game.

use rand::Rng;

use crate::config::FieldConfig;
use crate::domain::entity::{Sprite, StaticItem};
use super::world::{Phase, WorldState};

pub const PLAYER_START: (i32, i32) = (15, 0);
pub const DIFFICULTY_STEP: u32 = 2;

/// Random coordinate inside the spawn band.
pub fn random_pos(f: &FieldConfig, rng: &mut impl Rng) -> i32 {
    rng.gen_range(f.spawn_margin..f.size - f.spawn_margin)
}

/// Populate a fresh level at `difficulty` and start playing it.
pub fn setup_level(world: &mut WorldState, difficulty: u32, rng: &mut impl Rng) {
    let f = world.field.clone();
    world.difficulty = difficulty;
    world.gone_cats = 0;

    world.player = Some(Sprite::player(PLAYER_START.0, PLAYER_START.1, f.player_speed));

    let (gx, gy) = (random_pos(&f, rng), random_pos(&f, rng));
    world.goal = Some(StaticItem::goal(gx, gy, f.goal_size));

    world.cats = (0..f.cats_per_level)
        .map(|id| {
            let (x, y) = (random_pos(&f, rng), random_pos(&f, rng));
            Sprite::cat(id, x, y, f.cat_speed)
        })
        .collect();

    world.traps = (0..difficulty)
        .map(|_| {
            let (x, y) = (random_pos(&f, rng), random_pos(&f, rng));
            StaticItem::trap(x, y, f.trap_size)
        })
        .collect();

    world.phase = Phase::Playing;
    tracing::info!(
        difficulty,
        cats = world.cats.len(),
        traps = world.traps.len(),
        goal_x = gx,
        goal_y = gy,
        "level set up"
    );

    // A level ends once every spawned cat is gone, which holds at once
    // when none were spawned.
    if world.cats.is_empty() {
        clear_board(world);
    }
}

/// Destroy every entity and park the world on the matching prompt.
/// A negative score means game over: it resets to 0 here.
pub fn clear_board(world: &mut WorldState) {
    world.player = None;
    world.cats.clear();
    world.traps.clear();
    world.goal = None;
    world.gone_cats = 0;

    if world.score < 0 {
        world.last_difficulty = world.difficulty;
        world.score = 0;
        world.phase = Phase::GameOver;
        tracing::info!(difficulty = world.difficulty, "game over");
    } else {
        world.phase = Phase::LevelComplete;
        tracing::info!(difficulty = world.difficulty, score = world.score, "level complete");
    }
}

/// Apply the player's answer to whatever prompt the world is showing.
/// No effect outside a prompt phase.
pub fn answer_prompt(world: &mut WorldState, accepted: bool, rng: &mut impl Rng) {
    if world.prompt().is_none() {
        return;
    }
    if !accepted {
        tracing::info!(phase = ?world.phase, "player declined, halting");
        world.phase = Phase::Halted;
        return;
    }

    match world.phase {
        Phase::Title | Phase::GameOver => {
            world.score = 0;
            setup_level(world, 1, rng);
        }
        Phase::LevelComplete => {
            let next = world.difficulty + DIFFICULTY_STEP;
            setup_level(world, next, rng);
        }
        Phase::Playing | Phase::Halted => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::entity::Facing;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> WorldState {
        WorldState::new(GameConfig::default().field)
    }

    #[test]
    fn setup_spawns_five_cats_and_difficulty_traps() {
        let mut w = world();
        let mut rng = StdRng::seed_from_u64(3);
        setup_level(&mut w, 7, &mut rng);
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.cats.len(), 5);
        assert_eq!(w.traps.len(), 7);
        assert!(w.goal.is_some());
        let p = w.player.as_ref().unwrap();
        assert_eq!((p.x, p.y), PLAYER_START);
        assert_eq!(p.facing, Facing::Down);
        assert!(w.cats.iter().all(|c| c.active && c.facing == Facing::Rest));
    }

    #[test]
    fn spawns_stay_in_band() {
        let mut w = world();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            setup_level(&mut w, 9, &mut rng);
            let g = w.goal.as_ref().unwrap();
            let coords = w.cats.iter().map(|c| (c.x, c.y))
                .chain(w.traps.iter().map(|t| (t.x, t.y)))
                .chain(std::iter::once((g.x, g.y)));
            for (x, y) in coords {
                assert!((64..536).contains(&x) && (64..536).contains(&y));
            }
        }
    }

    #[test]
    fn zero_traps_is_a_playable_level() {
        let mut w = world();
        let mut rng = StdRng::seed_from_u64(0);
        setup_level(&mut w, 0, &mut rng);
        assert!(w.traps.is_empty());
        assert_eq!(w.cats.len(), 5);
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn level_without_cats_completes_immediately() {
        let mut field = GameConfig::default().field;
        field.cats_per_level = 0;
        let mut w = WorldState::new(field);
        let mut rng = StdRng::seed_from_u64(0);
        w.score = 3;
        setup_level(&mut w, 1, &mut rng);
        assert_eq!(w.phase, Phase::LevelComplete);
        assert_eq!(w.difficulty, 1);
        assert_eq!(w.score, 3);
        assert!(w.player.is_none() && w.goal.is_none());
    }

    #[test]
    fn clear_board_with_negative_score_is_game_over() {
        let mut w = world();
        let mut rng = StdRng::seed_from_u64(5);
        setup_level(&mut w, 3, &mut rng);
        w.score = -1;
        clear_board(&mut w);
        assert_eq!(w.phase, Phase::GameOver);
        assert_eq!(w.score, 0);
        assert_eq!(w.last_difficulty, 3);
        assert!(w.player.is_none() && w.cats.is_empty() && w.traps.is_empty() && w.goal.is_none());
    }

    #[test]
    fn clear_board_with_score_is_level_complete() {
        let mut w = world();
        let mut rng = StdRng::seed_from_u64(5);
        setup_level(&mut w, 1, &mut rng);
        w.score = 4;
        clear_board(&mut w);
        assert_eq!(w.phase, Phase::LevelComplete);
        assert_eq!(w.score, 4);
    }

    #[test]
    fn accepting_next_level_adds_two_difficulty() {
        let mut w = world();
        let mut rng = StdRng::seed_from_u64(8);
        setup_level(&mut w, 3, &mut rng);
        w.score = 6;
        clear_board(&mut w);
        answer_prompt(&mut w, true, &mut rng);
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.difficulty, 5);
        assert_eq!(w.traps.len(), 5);
        assert_eq!(w.cats.len(), 5);
        assert_eq!(w.score, 6);
    }

    #[test]
    fn play_again_restarts_at_level_one() {
        let mut w = world();
        let mut rng = StdRng::seed_from_u64(8);
        setup_level(&mut w, 9, &mut rng);
        w.score = -1;
        clear_board(&mut w);
        answer_prompt(&mut w, true, &mut rng);
        assert_eq!(w.difficulty, 1);
        assert_eq!(w.traps.len(), 1);
        assert_eq!(w.score, 0);
    }

    #[test]
    fn declining_any_prompt_halts() {
        let mut rng = StdRng::seed_from_u64(2);
        for phase in [Phase::Title, Phase::GameOver, Phase::LevelComplete] {
            let mut w = world();
            w.phase = phase;
            answer_prompt(&mut w, false, &mut rng);
            assert_eq!(w.phase, Phase::Halted);
            answer_prompt(&mut w, true, &mut rng);
            assert_eq!(w.phase, Phase::Halted);
            assert!(w.player.is_none());
        }
    }

    #[test]
    fn answer_ignored_while_playing() {
        let mut w = world();
        let mut rng = StdRng::seed_from_u64(2);
        setup_level(&mut w, 1, &mut rng);
        answer_prompt(&mut w, false, &mut rng);
        assert_eq!(w.phase, Phase::Playing);
    }
}
