//! Timing and judgement engine for the PianoAI rhythm trainer.
//!
//! The engine consumes a song's note list plus a stream of note-on events
//! and produces judgements, score and session phase. Rendering, audio and
//! persistence are left to the host.

pub mod config;
pub mod gameplay;
pub mod input;
pub mod rating;
pub mod session;
pub mod time;

pub use config::{ConfigError, EngineConfig, JudgeWindows, ScoringPolicy};
pub use gameplay::{
    EngineEvent, EngineSnapshot, GameEngine, Judgement, LastHit, NoteState, NoteStatus,
    PlayResult, ScoreState,
};
pub use time::Phase;
