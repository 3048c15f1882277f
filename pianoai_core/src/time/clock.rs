use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Countdown,
    Playing,
    Finished,
}

/// What a single `Clock::tick` did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Seconds added to the session clock (0 outside `Playing`).
    pub advanced: f64,
    /// Countdown value after this tick, when it dropped.
    pub countdown_dropped: Option<u32>,
    /// Phase after this tick, when it changed.
    pub phase_changed: Option<Phase>,
}

impl TickOutcome {
    fn idle() -> Self {
        Self {
            advanced: 0.0,
            countdown_dropped: None,
            phase_changed: None,
        }
    }
}

/// Session clock driven by host wall time.
///
/// Elapsed time only moves while `Playing` and never decreases. Wall time is
/// passed in by the caller, so the clock is deterministic under test.
#[derive(Debug, Clone)]
pub struct Clock {
    phase: Phase,
    countdown: u32,
    countdown_interval: f64,
    countdown_accum: f64,
    elapsed: f64,
    duration: f64,
    last_wall_time: Option<f64>,
}

impl Clock {
    pub fn new(countdown_start: u32, countdown_interval: f64, duration: f64) -> Self {
        let mut clock = Self {
            phase: Phase::Countdown,
            countdown: 0,
            countdown_interval,
            countdown_accum: 0.0,
            elapsed: 0.0,
            duration,
            last_wall_time: None,
        };
        clock.reset(countdown_start);
        clock
    }

    /// Back to the start of a session. The next tick only records the
    /// reference wall time.
    pub fn reset(&mut self, countdown_start: u32) {
        self.countdown = countdown_start;
        self.countdown_accum = 0.0;
        self.elapsed = 0.0;
        self.last_wall_time = None;
        self.phase = Phase::Countdown;
        if countdown_start == 0 {
            self.enter_playing();
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn tick(&mut self, wall_time: f64) -> TickOutcome {
        if self.phase == Phase::Finished {
            return TickOutcome::idle();
        }

        let delta = match self.last_wall_time {
            Some(last) if wall_time >= last => wall_time - last,
            Some(last) => {
                warn!("host clock went backwards by {:.6}s; treating as no-op", last - wall_time);
                0.0
            }
            None => 0.0,
        };
        // Keep the later instant so a backwards step cannot be counted twice.
        self.last_wall_time = Some(self.last_wall_time.map_or(wall_time, |last| last.max(wall_time)));

        let mut outcome = TickOutcome::idle();
        match self.phase {
            Phase::Countdown => {
                self.countdown_accum += delta;
                let mut dropped = false;
                while self.countdown > 0 && self.countdown_accum >= self.countdown_interval {
                    self.countdown_accum -= self.countdown_interval;
                    self.countdown -= 1;
                    dropped = true;
                }
                if dropped {
                    outcome.countdown_dropped = Some(self.countdown);
                }
                if self.countdown == 0 {
                    self.enter_playing();
                    outcome.phase_changed = Some(self.phase);
                }
            }
            Phase::Playing => {
                if delta > 0.0 {
                    self.elapsed += delta;
                    outcome.advanced = delta;
                }
                if self.elapsed >= self.duration {
                    self.finish();
                    outcome.phase_changed = Some(Phase::Finished);
                }
            }
            Phase::Finished => unreachable!("handled above"),
        }
        outcome
    }

    fn enter_playing(&mut self) {
        self.countdown_accum = 0.0;
        self.elapsed = 0.0;
        self.phase = Phase::Playing;
        debug!("clock: playing (duration {:.3}s)", self.duration);
        if self.elapsed >= self.duration {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.phase = Phase::Finished;
        debug!("clock: finished at {:.3}s", self.elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_countdown_starts_playing() {
        let clock = Clock::new(0, 1.0, 10.0);
        assert_eq!(clock.phase(), Phase::Playing);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn zero_duration_finishes_when_playing_begins() {
        let mut clock = Clock::new(1, 1.0, 0.0);
        clock.tick(0.0);
        let outcome = clock.tick(1.0);
        assert_eq!(outcome.phase_changed, Some(Phase::Finished));
        assert_eq!(clock.phase(), Phase::Finished);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn large_gap_drops_several_counts_at_once() {
        let mut clock = Clock::new(3, 1.0, 10.0);
        clock.tick(0.0);
        let outcome = clock.tick(2.5);
        assert_eq!(outcome.countdown_dropped, Some(1));
        assert_eq!(clock.phase(), Phase::Countdown);
        assert_eq!(clock.elapsed(), 0.0);
    }
}
