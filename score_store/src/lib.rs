//! Best-score persistence for PianoAI.
//!
//! Storage is a plain string key/value capability so hosts can back it with
//! a directory, a browser store or memory.

pub mod best;
pub mod store;

pub use best::{BestScore, BestScores, BEST_SCORES_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
