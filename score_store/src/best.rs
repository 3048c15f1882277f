use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::store::{KeyValueStore, StoreError};

/// Key the whole best-score map is stored under.
pub const BEST_SCORES_KEY: &str = "pianoai-best-scores";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    pub accuracy: u8,
    pub points: u64,
    pub stars: u8,
}

/// Per-song best results on top of a `KeyValueStore`.
///
/// Entries are ranked by accuracy only. A record that fails to parse is
/// treated as empty, so one bad write never locks the player out.
pub struct BestScores<S> {
    store: S,
}

impl<S: KeyValueStore> BestScores<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn all(&self) -> Result<BTreeMap<String, BestScore>, StoreError> {
        let Some(raw) = self.store.load(BEST_SCORES_KEY)? else {
            return Ok(BTreeMap::new());
        };
        match serde_json::from_str(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!("ignoring corrupt best-score record: {}", e);
                Ok(BTreeMap::new())
            }
        }
    }

    pub fn get(&self, song_id: &str) -> Result<Option<BestScore>, StoreError> {
        Ok(self.all()?.remove(song_id))
    }

    /// Stores `score` if it beats the existing entry's accuracy (or there is
    /// none). Returns whether it was stored.
    pub fn record(&self, song_id: &str, score: BestScore) -> Result<bool, StoreError> {
        let mut all = self.all()?;
        if let Some(existing) = all.get(song_id) {
            if score.accuracy <= existing.accuracy {
                debug!(
                    "best for `{}` kept at {}% (new {}%)",
                    song_id, existing.accuracy, score.accuracy
                );
                return Ok(false);
            }
        }
        all.insert(song_id.to_string(), score);
        let raw = serde_json::to_string(&all).map_err(|source| StoreError::Json {
            key: BEST_SCORES_KEY.to_string(),
            source,
        })?;
        self.store.save(BEST_SCORES_KEY, &raw)?;
        debug!("new best for `{}`: {}%", song_id, score.accuracy);
        Ok(true)
    }
}
