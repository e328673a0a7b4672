/// Events emitted during a simulation tick.
/// The presentation layer consumes these for sound, HUD and logging.

use crate::domain::entity::MoveDir;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    CatFled { id: usize, dir: MoveDir },
    CatCaptured { id: usize },
    CatTrapped { id: usize, trap: usize },
    ScoreChanged { score: i32 },
    LevelCleared { difficulty: u32, score: i32 },
    GameOver { difficulty: u32 },
}
