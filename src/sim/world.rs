/// WorldState: the complete state of a running game.
///
/// Owned by the main loop and threaded explicitly through `step::tick`,
/// `step::animate` and the `level` transitions. There is no other mutable
/// game state anywhere.
///
/// ## Phases
///
///   Title ──yes──▶ Playing ──all cats gone──▶ LevelComplete ──yes──▶ Playing
///                     │                                      (difficulty + 2)
///                     └──score < 0──▶ GameOver ──yes──▶ Playing (difficulty 1)
///
/// Any "no" answer moves to `Halted`, which ignores all further input.
/// Level setup itself is instantaneous (`level::setup_level`), so it never
/// shows up as a resting phase.

use crate::config::FieldConfig;
use crate::domain::entity::{Sprite, StaticItem};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Playing,
    LevelComplete,
    GameOver,
    Halted,
}

/// The yes/no question the player is currently being asked, if any.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Prompt {
    StartGame,
    PlayAgain { highest_level: u32 },
    NextLevel,
}

impl Prompt {
    pub fn text(self) -> String {
        match self {
            Prompt::StartGame => "Oh no! The cats are loose in a dangerous area! \
                Herd them into the box. Start game?".to_string(),
            Prompt::PlayAgain { highest_level } => {
                format!("Game Over! Highest level: {}. Play again?", highest_level)
            }
            Prompt::NextLevel => "Good Job! Next Level?".to_string(),
        }
    }
}

pub struct WorldState {
    // ── Field ──
    pub field: FieldConfig,

    // ── Entities (empty between levels) ──
    pub player: Option<Sprite>,
    pub cats: Vec<Sprite>,
    pub traps: Vec<StaticItem>,
    pub goal: Option<StaticItem>,

    // ── Level tracking ──
    pub score: i32,
    pub difficulty: u32,
    /// Cats removed from play this level, by goal or trap.
    pub gone_cats: usize,
    /// Difficulty of the level that ended in game over, for the prompt.
    pub last_difficulty: u32,

    // ── Meta ──
    pub phase: Phase,
    pub tick: u64,
}

impl WorldState {
    pub fn new(field: FieldConfig) -> Self {
        WorldState {
            field,
            player: None,
            cats: vec![],
            traps: vec![],
            goal: None,
            score: 0,
            difficulty: 1,
            gone_cats: 0,
            last_difficulty: 1,
            phase: Phase::Title,
            tick: 0,
        }
    }

    /// The question the current phase is waiting on.
    pub fn prompt(&self) -> Option<Prompt> {
        match self.phase {
            Phase::Title => Some(Prompt::StartGame),
            Phase::GameOver => Some(Prompt::PlayAgain { highest_level: self.last_difficulty }),
            Phase::LevelComplete => Some(Prompt::NextLevel),
            Phase::Playing | Phase::Halted => None,
        }
    }

    pub fn active_cats(&self) -> impl Iterator<Item = &Sprite> {
        self.cats.iter().filter(|c| c.active)
    }

    /// Every sprite that is still drawn: the dog and uncaptured cats.
    pub fn live_sprites_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        self.player.iter_mut().chain(self.cats.iter_mut().filter(|c| c.active))
    }

    pub fn level_finished(&self) -> bool {
        self.gone_cats == self.cats.len()
    }
}
