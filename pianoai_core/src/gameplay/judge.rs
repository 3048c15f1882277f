use crate::config::JudgeWindows;

use super::state::NoteTable;
use super::Judgement;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JudgmentResult {
    pub note_index: usize,
    pub judgement: Judgement,
    /// `elapsed - note.time`: negative is early, positive is late.
    pub delta: f64,
}

/// Matches presses against the note table. Holds no per-session state, so
/// one judge can serve any number of restarts.
#[derive(Debug, Clone, Default)]
pub struct Judge {
    windows: JudgeWindows,
}

impl Judge {
    pub fn new(windows: JudgeWindows) -> Self {
        Self { windows }
    }

    pub fn windows(&self) -> &JudgeWindows {
        &self.windows
    }

    /// Finds the upcoming note of `pitch` nearest to `elapsed` within the
    /// widest window. Ties go to the earlier note. Does not mutate the table.
    pub fn find_match(&self, table: &NoteTable, pitch: &str, elapsed: f64) -> Option<JudgmentResult> {
        let widest = self.windows.widest();
        let mut best: Option<(usize, f64)> = None;

        for &idx in table.indices_for_pitch(pitch) {
            let Some(state) = table.get(idx) else {
                continue;
            };
            if state.time - elapsed > widest {
                // Sorted by time: nothing later can be closer.
                break;
            }
            if !state.status.is_upcoming() {
                continue;
            }
            let abs = (elapsed - state.time).abs();
            if abs > widest {
                continue;
            }
            // Strict comparison keeps the earliest note on a tie.
            if best.map_or(true, |(_, best_abs)| abs < best_abs) {
                best = Some((idx, abs));
            }
        }

        let (note_index, abs) = best?;
        let judgement = self.windows.classify(abs)?;
        let delta = table.get(note_index).map(|s| elapsed - s.time)?;
        Some(JudgmentResult {
            note_index,
            judgement,
            delta,
        })
    }

    /// Marks notes that can no longer be hit as missed.
    pub fn check_misses(&self, table: &mut NoteTable, elapsed: f64) -> Vec<usize> {
        table.sweep_expired(elapsed, self.windows.widest())
    }
}
