use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gameplay::Judgement;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("judge window `{name}` must be finite and > 0 (got {value})")]
    InvalidWindow { name: &'static str, value: f64 },
    #[error("judge windows must be strictly increasing (perfect {perfect} < good {good} < ok {ok})")]
    WindowOrder { perfect: f64, good: f64, ok: f64 },
    #[error("base points must satisfy perfect >= good >= ok (got {perfect}/{good}/{ok})")]
    PointOrder { perfect: u32, good: u32, ok: u32 },
    #[error("`{0}` must be >= 1")]
    ZeroScaling(&'static str),
    #[error("countdown interval must be finite and > 0 (got {0})")]
    CountdownInterval(f64),
    #[error("`{name}` must be finite and >= 0 (got {value})")]
    LookWindow { name: &'static str, value: f64 },
}

/// Half-widths of the hit windows in seconds, innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeWindows {
    pub perfect: f64,
    pub good: f64,
    pub ok: f64,
}

impl Default for JudgeWindows {
    fn default() -> Self {
        Self {
            perfect: 0.050,
            good: 0.100,
            ok: 0.150,
        }
    }
}

impl JudgeWindows {
    /// Widest tolerance. Presses beyond it match nothing and the sweeper
    /// uses it as the grace period before a miss.
    pub fn widest(&self) -> f64 {
        self.ok
    }

    pub fn classify(&self, abs_error: f64) -> Option<Judgement> {
        if abs_error <= self.perfect {
            Some(Judgement::Perfect)
        } else if abs_error <= self.good {
            Some(Judgement::Good)
        } else if abs_error <= self.ok {
            Some(Judgement::Ok)
        } else {
            None
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("perfect", self.perfect), ("good", self.good), ("ok", self.ok)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidWindow { name, value });
            }
        }
        if !(self.perfect < self.good && self.good < self.ok) {
            return Err(ConfigError::WindowOrder {
                perfect: self.perfect,
                good: self.good,
                ok: self.ok,
            });
        }
        Ok(())
    }
}

/// Points awarded per hit: `base(tier) * min(1 + combo / combo_step, max_multiplier)`,
/// evaluated with the combo that includes the hit being scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub perfect: u32,
    pub good: u32,
    pub ok: u32,
    pub combo_step: u32,
    pub max_multiplier: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            perfect: 100,
            good: 70,
            ok: 40,
            combo_step: 10,
            max_multiplier: 4,
        }
    }
}

impl ScoringPolicy {
    pub fn base(&self, judgement: Judgement) -> u32 {
        match judgement {
            Judgement::Perfect => self.perfect,
            Judgement::Good => self.good,
            Judgement::Ok => self.ok,
        }
    }

    pub fn multiplier(&self, combo: u32) -> u32 {
        let step = self.combo_step.max(1);
        (1 + combo / step).min(self.max_multiplier.max(1))
    }

    pub fn points(&self, judgement: Judgement, combo: u32) -> u64 {
        u64::from(self.base(judgement)) * u64::from(self.multiplier(combo))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.perfect >= self.good && self.good >= self.ok) {
            return Err(ConfigError::PointOrder {
                perfect: self.perfect,
                good: self.good,
                ok: self.ok,
            });
        }
        if self.combo_step == 0 {
            return Err(ConfigError::ZeroScaling("combo_step"));
        }
        if self.max_multiplier == 0 {
            return Err(ConfigError::ZeroScaling("max_multiplier"));
        }
        Ok(())
    }
}

/// Tunables for one play session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub judge: JudgeWindows,
    pub scoring: ScoringPolicy,
    /// Count shown when a session starts. Zero starts playing immediately.
    pub countdown_start: u32,
    /// Wall-clock seconds per countdown step.
    pub countdown_interval: f64,
    /// How far ahead of the hit line notes are reported as visible.
    pub look_ahead: f64,
    /// How long past the hit line notes stay visible.
    pub look_behind: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            judge: JudgeWindows::default(),
            scoring: ScoringPolicy::default(),
            countdown_start: 3,
            countdown_interval: 1.0,
            look_ahead: 4.0,
            look_behind: 2.0,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.judge.validate()?;
        self.scoring.validate()?;
        if !self.countdown_interval.is_finite() || self.countdown_interval <= 0.0 {
            return Err(ConfigError::CountdownInterval(self.countdown_interval));
        }
        for (name, value) in [("look_ahead", self.look_ahead), ("look_behind", self.look_behind)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::LookWindow { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    perfect_window: Option<f64>,
    good_window: Option<f64>,
    ok_window: Option<f64>,
    scoring: Option<ScoringPolicy>,
    countdown_start: Option<u32>,
    countdown_interval: Option<f64>,
    look_ahead: Option<f64>,
    look_behind: Option<f64>,
}

impl EngineConfigBuilder {
    pub fn perfect_window(mut self, secs: f64) -> Self {
        self.perfect_window = Some(secs);
        self
    }

    pub fn good_window(mut self, secs: f64) -> Self {
        self.good_window = Some(secs);
        self
    }

    pub fn ok_window(mut self, secs: f64) -> Self {
        self.ok_window = Some(secs);
        self
    }

    pub fn scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = Some(scoring);
        self
    }

    pub fn countdown_start(mut self, count: u32) -> Self {
        self.countdown_start = Some(count);
        self
    }

    pub fn countdown_interval(mut self, secs: f64) -> Self {
        self.countdown_interval = Some(secs);
        self
    }

    pub fn look_ahead(mut self, secs: f64) -> Self {
        self.look_ahead = Some(secs);
        self
    }

    pub fn look_behind(mut self, secs: f64) -> Self {
        self.look_behind = Some(secs);
        self
    }

    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let default = EngineConfig::default();
        let config = EngineConfig {
            judge: JudgeWindows {
                perfect: self.perfect_window.unwrap_or(default.judge.perfect),
                good: self.good_window.unwrap_or(default.judge.good),
                ok: self.ok_window.unwrap_or(default.judge.ok),
            },
            scoring: self.scoring.unwrap_or(default.scoring),
            countdown_start: self.countdown_start.unwrap_or(default.countdown_start),
            countdown_interval: self.countdown_interval.unwrap_or(default.countdown_interval),
            look_ahead: self.look_ahead.unwrap_or(default.look_ahead),
            look_behind: self.look_behind.unwrap_or(default.look_behind),
        };
        config.validate()?;
        Ok(config)
    }
}
