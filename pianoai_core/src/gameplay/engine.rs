use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use song_schema::Song;

use crate::config::{ConfigError, EngineConfig};
use crate::input::{InputEvent, InputQueue};
use crate::rating::stars_for_accuracy;
use crate::time::{Clock, Phase};

use super::judge::Judge;
use super::score::ScoreState;
use super::state::{NoteState, NoteStatus, NoteTable};
use super::Judgement;

/// Most recent successful press, for transient on-screen feedback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LastHit {
    pub judgement: Judgement,
    /// Session time of the press.
    pub timestamp: f64,
    pub note_index: usize,
    pub delta: f64,
    /// Increases by one per hit within a session.
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Started,
    CountdownTick { remaining: u32 },
    PhaseChanged { phase: Phase },
    NoteResolved {
        index: usize,
        status: NoteStatus,
        score: ScoreState,
    },
}

/// Owned copy of everything a renderer reads between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub phase: Phase,
    pub countdown: u32,
    pub elapsed_time: f64,
    pub duration: f64,
    pub note_states: Vec<NoteState>,
    pub score: ScoreState,
    pub accuracy: u8,
    pub last_hit: Option<LastHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayResult {
    pub song_id: String,
    pub title: String,
    pub artist: String,
    pub score: ScoreState,
    pub accuracy: u8,
    pub stars: u8,
    pub total_notes: u32,
    /// Notes still upcoming when the result was taken.
    pub unresolved: u32,
    pub full_combo: bool,
}

/// Gameplay timing and judgement for one song.
///
/// Single owner, no internal locking: ticks and presses must come from the
/// same context (see `session::SessionDriver` for a threaded host).
pub struct GameEngine {
    song: Song,
    config: EngineConfig,
    judge: Judge,
    clock: Clock,
    table: NoteTable,
    score: ScoreState,
    last_hit: Option<LastHit>,
    hit_seq: u64,
    subscribers: Vec<Sender<EngineEvent>>,
}

impl GameEngine {
    /// Builds an engine ready for its first countdown.
    pub fn new(song: Song, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(song, config))
    }

    pub fn with_default_config(song: Song) -> Self {
        Self::build(song, EngineConfig::default())
    }

    fn build(song: Song, config: EngineConfig) -> Self {
        if !song.is_sorted() {
            warn!("song `{}` has notes out of time order", song.id);
        }
        // Nothing to play: finish as soon as the countdown ends.
        let duration = if song.notes.is_empty() { 0.0 } else { song.duration };
        let clock = Clock::new(config.countdown_start, config.countdown_interval, duration);
        let table = NoteTable::from_song(&song);
        Self {
            judge: Judge::new(config.judge),
            song,
            config,
            clock,
            table,
            score: ScoreState::new(),
            last_hit: None,
            hit_seq: 0,
            subscribers: Vec::new(),
        }
    }

    /// Starts (or restarts) the session from the countdown.
    pub fn start(&mut self) {
        self.clock.reset(self.config.countdown_start);
        self.table = NoteTable::from_song(&self.song);
        self.score.reset();
        self.last_hit = None;
        self.hit_seq = 0;
        debug!(
            "session start: `{}` ({} notes, {:.3}s)",
            self.song.id,
            self.table.len(),
            self.song.duration
        );
        self.emit(EngineEvent::Started);
        if self.clock.phase() != Phase::Countdown {
            self.emit(EngineEvent::PhaseChanged {
                phase: self.clock.phase(),
            });
        }
    }

    /// Advances the session to host wall time `now` (seconds).
    pub fn tick(&mut self, now: f64) {
        if self.clock.phase() == Phase::Finished {
            return;
        }

        let outcome = self.clock.tick(now);

        if let Some(remaining) = outcome.countdown_dropped {
            self.emit(EngineEvent::CountdownTick { remaining });
        }
        if outcome.advanced > 0.0 {
            self.sweep_misses();
        }
        if let Some(phase) = outcome.phase_changed {
            debug!("phase -> {:?} at {:.3}s", phase, self.clock.elapsed());
            self.emit(EngineEvent::PhaseChanged { phase });
        }
    }

    fn sweep_misses(&mut self) {
        let elapsed = self.clock.elapsed();
        for index in self.judge.check_misses(&mut self.table, elapsed) {
            self.score.add_miss();
            trace!("miss: note {} at {:.3}s", index, elapsed);
            self.emit(EngineEvent::NoteResolved {
                index,
                status: NoteStatus::Missed,
                score: self.score,
            });
        }
    }

    /// Judges a press of `pitch` at the current session time. Returns the
    /// published hit, or `None` when the press matched nothing.
    pub fn handle_note_on(&mut self, pitch: &str) -> Option<LastHit> {
        if self.clock.phase() != Phase::Playing {
            return None;
        }
        let elapsed = self.clock.elapsed();
        let result = self.judge.find_match(&self.table, pitch, elapsed)?;
        let status = NoteStatus::from(result.judgement);
        if !self.table.resolve(result.note_index, status) {
            return None;
        }

        let combo = self.score.add_hit(result.judgement);
        self.score
            .add_points(self.config.scoring.points(result.judgement, combo));

        self.hit_seq += 1;
        let hit = LastHit {
            judgement: result.judgement,
            timestamp: elapsed,
            note_index: result.note_index,
            delta: result.delta,
            seq: self.hit_seq,
        };
        self.last_hit = Some(hit);
        trace!(
            "{} {}: note {} delta {:+.3}s combo {}",
            result.judgement.label(),
            pitch,
            result.note_index,
            result.delta,
            combo
        );
        self.emit(EngineEvent::NoteResolved {
            index: result.note_index,
            status,
            score: self.score,
        });
        Some(hit)
    }

    /// Applies queued note-ons in arrival order. Returns how many hit.
    pub fn drain_input(&mut self, queue: &InputQueue) -> usize {
        let mut hits = 0;
        while let Some(event) = queue.pop() {
            if let InputEvent::NoteOn { pitch } = event {
                if self.handle_note_on(&pitch).is_some() {
                    hits += 1;
                }
            }
        }
        hits
    }

    /// Registers a push subscriber. Dropped receivers are pruned on the
    /// next event.
    pub fn subscribe(&mut self) -> Receiver<EngineEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: EngineEvent) {
        if self.subscribers.is_empty() {
            return;
        }
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.clock.phase()
    }

    pub fn countdown(&self) -> u32 {
        self.clock.countdown()
    }

    pub fn elapsed_time(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn note_states(&self) -> &[NoteState] {
        self.table.states()
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn accuracy(&self) -> u8 {
        self.score.accuracy()
    }

    pub fn last_hit(&self) -> Option<&LastHit> {
        self.last_hit.as_ref()
    }

    /// Fraction of the song played, in [0, 1].
    pub fn progress(&self) -> f64 {
        let duration = self.clock.duration();
        if duration <= 0.0 {
            return 0.0;
        }
        (self.clock.elapsed() / duration).clamp(0.0, 1.0)
    }

    /// Notes inside the falling-notes window around the hit line.
    pub fn visible_notes(&self) -> impl Iterator<Item = (usize, &NoteState)> + '_ {
        let elapsed = self.clock.elapsed();
        let ahead = self.config.look_ahead;
        let behind = self.config.look_behind;
        self.table
            .states()
            .iter()
            .enumerate()
            .filter(move |(_, s)| {
                let dt = s.time - elapsed;
                dt >= -behind && dt <= ahead
            })
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            phase: self.phase(),
            countdown: self.countdown(),
            elapsed_time: self.elapsed_time(),
            duration: self.clock.duration(),
            note_states: self.table.states().to_vec(),
            score: self.score,
            accuracy: self.accuracy(),
            last_hit: self.last_hit,
        }
    }

    pub fn result(&self) -> PlayResult {
        let accuracy = self.accuracy();
        let total_notes = self.table.len() as u32;
        PlayResult {
            song_id: self.song.id.clone(),
            title: self.song.title.clone(),
            artist: self.song.artist.clone(),
            score: self.score,
            accuracy,
            stars: stars_for_accuracy(accuracy),
            total_notes,
            unresolved: self.table.unresolved_count() as u32,
            full_combo: total_notes > 0 && self.score.hits() == total_notes,
        }
    }
}
