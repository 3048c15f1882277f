pub mod engine;
pub mod judge;
pub mod score;
pub mod state;

use serde::{Deserialize, Serialize};

pub use engine::{EngineEvent, EngineSnapshot, GameEngine, LastHit, PlayResult};
pub use judge::{Judge, JudgmentResult};
pub use score::ScoreState;
pub use state::{NoteState, NoteStatus, NoteTable};

/// Timing tier of a successful press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Judgement {
    Perfect,
    Good,
    Ok,
}

impl Judgement {
    pub fn label(&self) -> &'static str {
        match self {
            Judgement::Perfect => "PERFECT",
            Judgement::Good => "GOOD",
            Judgement::Ok => "OK",
        }
    }
}
