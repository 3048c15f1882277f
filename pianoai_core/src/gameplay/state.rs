use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use song_schema::Song;

use super::Judgement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    Upcoming,
    Perfect,
    Good,
    Ok,
    Missed,
}

impl NoteStatus {
    pub fn is_upcoming(&self) -> bool {
        matches!(self, Self::Upcoming)
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Perfect | Self::Good | Self::Ok)
    }
}

impl From<Judgement> for NoteStatus {
    fn from(judgement: Judgement) -> Self {
        match judgement {
            Judgement::Perfect => NoteStatus::Perfect,
            Judgement::Good => NoteStatus::Good,
            Judgement::Ok => NoteStatus::Ok,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteState {
    pub note: String,
    pub time: f64,
    pub duration: f64,
    pub status: NoteStatus,
}

/// Per-note status for one session, indexed like `Song::notes`.
#[derive(Debug, Clone, Default)]
pub struct NoteTable {
    states: Vec<NoteState>,
    /// Indices ordered by (time, index).
    by_time: Vec<usize>,
    /// Indices per pitch, ordered by (time, index).
    by_pitch: HashMap<String, Vec<usize>>,
    /// Everything before this position in `by_time` is resolved.
    sweep_cursor: usize,
}

impl NoteTable {
    pub fn from_song(song: &Song) -> Self {
        let states: Vec<NoteState> = song
            .notes
            .iter()
            .map(|n| NoteState {
                note: n.note.clone(),
                time: n.time,
                duration: n.duration,
                status: NoteStatus::Upcoming,
            })
            .collect();

        let mut by_time: Vec<usize> = (0..states.len()).collect();
        by_time.sort_by(|&a, &b| states[a].time.total_cmp(&states[b].time).then(a.cmp(&b)));

        let mut by_pitch: HashMap<String, Vec<usize>> = HashMap::new();
        for &i in &by_time {
            by_pitch.entry(states[i].note.clone()).or_default().push(i);
        }

        Self {
            states,
            by_time,
            by_pitch,
            sweep_cursor: 0,
        }
    }

    pub fn states(&self) -> &[NoteState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NoteState> {
        self.states.get(index)
    }

    /// Time-ordered indices of every note with this pitch.
    pub fn indices_for_pitch(&self, pitch: &str) -> &[usize] {
        self.by_pitch.get(pitch).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Moves an upcoming note to `status`. Returns false (and changes
    /// nothing) when the note is already resolved or does not exist.
    pub fn resolve(&mut self, index: usize, status: NoteStatus) -> bool {
        if status.is_upcoming() {
            return false;
        }
        match self.states.get_mut(index) {
            Some(state) if state.status.is_upcoming() => {
                state.status = status;
                true
            }
            _ => false,
        }
    }

    /// Marks every upcoming note whose time is more than `grace` seconds
    /// before `elapsed` as missed and returns their indices in time order.
    pub fn sweep_expired(&mut self, elapsed: f64, grace: f64) -> Vec<usize> {
        let mut missed = Vec::new();
        while let Some(&i) = self.by_time.get(self.sweep_cursor) {
            let state = &mut self.states[i];
            if elapsed - state.time <= grace {
                break;
            }
            if state.status.is_upcoming() {
                state.status = NoteStatus::Missed;
                missed.push(i);
            }
            self.sweep_cursor += 1;
        }
        missed
    }

    pub fn unresolved_count(&self) -> usize {
        self.states.iter().filter(|s| s.status.is_upcoming()).count()
    }

    pub fn all_resolved(&self) -> bool {
        self.states.iter().all(|s| !s.status.is_upcoming())
    }
}
