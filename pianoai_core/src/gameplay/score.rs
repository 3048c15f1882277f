use serde::{Deserialize, Serialize};

use super::Judgement;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub points: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub perfect: u32,
    pub good: u32,
    pub ok: u32,
    pub misses: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a hit and returns the combo including it.
    pub fn add_hit(&mut self, judgement: Judgement) -> u32 {
        match judgement {
            Judgement::Perfect => self.perfect += 1,
            Judgement::Good => self.good += 1,
            Judgement::Ok => self.ok += 1,
        }
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        self.combo
    }

    pub fn add_points(&mut self, points: u64) {
        self.points = self.points.saturating_add(points);
    }

    pub fn add_miss(&mut self) {
        self.misses += 1;
        self.combo = 0;
    }

    pub fn hits(&self) -> u32 {
        self.perfect + self.good + self.ok
    }

    pub fn resolved(&self) -> u32 {
        self.hits() + self.misses
    }

    /// Whole-number percentage of resolved notes that were hit; 0 before
    /// anything is resolved.
    pub fn accuracy(&self) -> u8 {
        let total = self.resolved();
        if total == 0 {
            return 0;
        }
        (100.0 * f64::from(self.hits()) / f64::from(total)).round() as u8
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
