use std::collections::VecDeque;
use std::{fs, path::Path};

use anyhow::Context;
use crossbeam_channel::Receiver;
use pianoai_core::{EngineEvent, GameEngine, NoteStatus, Phase, PlayResult};
use serde::Deserialize;
use song_schema::Song;

/// One scripted key press, in song time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptedPress {
    pub time: f64,
    pub note: String,
}

/// Presses ordered by time.
#[derive(Debug, Clone, Default)]
pub struct PressSchedule {
    presses: VecDeque<ScriptedPress>,
}

impl PressSchedule {
    pub fn new(mut presses: Vec<ScriptedPress>) -> Self {
        presses.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            presses: presses.into(),
        }
    }

    /// Every note pressed exactly at its start time.
    pub fn autoplay(song: &Song) -> Self {
        Self::new(
            song.notes
                .iter()
                .map(|n| ScriptedPress {
                    time: n.time,
                    note: n.note.clone(),
                })
                .collect(),
        )
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read inputs: {}", path.display()))?;
        let presses: Vec<ScriptedPress> = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse inputs json: {}", path.display()))?;
        if let Some(bad) = presses.iter().find(|p| !p.time.is_finite()) {
            anyhow::bail!("input press `{}` has a non-finite time", bad.note);
        }
        Ok(Self::new(presses))
    }

    pub fn len(&self) -> usize {
        self.presses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presses.is_empty()
    }
}

/// Drives an engine with a synthetic wall clock until the song finishes,
/// printing a timeline of resolved notes.
pub struct Simulation {
    engine: GameEngine,
    events: Receiver<EngineEvent>,
    presses: PressSchedule,
    frame: f64,
    wall: f64,
}

impl Simulation {
    pub fn new(mut engine: GameEngine, presses: PressSchedule, frame: f64) -> Self {
        let events = engine.subscribe();
        Self {
            engine,
            events,
            presses,
            frame,
            wall: 0.0,
        }
    }

    pub fn run(&mut self) -> PlayResult {
        self.engine.start();
        self.engine.tick(self.wall);
        self.print_events();

        while self.engine.phase() != Phase::Finished {
            if self.press_due() {
                continue;
            }
            self.wall += self.frame;
            self.engine.tick(self.wall);
            self.print_events();
        }
        self.print_events();
        self.engine.result()
    }

    /// Applies the next press if it falls within the coming frame, ticking
    /// the clock to exactly its time first.
    fn press_due(&mut self) -> bool {
        if self.engine.phase() != Phase::Playing {
            return false;
        }
        let elapsed = self.engine.elapsed_time();
        let Some(next) = self.presses.presses.front() else {
            return false;
        };
        if next.time > elapsed + self.frame {
            return false;
        }
        let Some(press) = self.presses.presses.pop_front() else {
            return false;
        };
        // Presses scheduled in the past land at the current time.
        self.wall += (press.time - elapsed).max(0.0);
        self.engine.tick(self.wall);
        self.engine.handle_note_on(&press.note);
        self.print_events();
        true
    }

    fn print_events(&self) {
        for event in self.events.try_iter() {
            match event {
                EngineEvent::Started => println!("start {}", self.engine.song().id),
                EngineEvent::CountdownTick { remaining } => println!("countdown {}", remaining),
                EngineEvent::PhaseChanged { phase } => {
                    println!("phase {}", phase_label(phase));
                }
                EngineEvent::NoteResolved { index, status, score } => {
                    let state = &self.engine.note_states()[index];
                    println!(
                        "{:>8.3} {:<4} {:<7} combo={} points={}",
                        state.time,
                        state.note,
                        status_label(status),
                        score.combo,
                        score.points
                    );
                }
            }
        }
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Countdown => "countdown",
        Phase::Playing => "playing",
        Phase::Finished => "finished",
    }
}

fn status_label(status: NoteStatus) -> &'static str {
    match status {
        NoteStatus::Upcoming => "upcoming",
        NoteStatus::Perfect => "perfect",
        NoteStatus::Good => "good",
        NoteStatus::Ok => "ok",
        NoteStatus::Missed => "miss",
    }
}
