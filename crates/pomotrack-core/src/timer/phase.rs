use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::storage::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(&self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "Focus",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Phase {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "work" | "focus" => Ok(Phase::Work),
            "short_break" | "short" => Ok(Phase::ShortBreak),
            "long_break" | "long" => Ok(Phase::LongBreak),
            other => Err(ValidationError::InvalidValue {
                field: "phase".into(),
                message: format!("unknown phase '{other}'"),
            }),
        }
    }
}

/// Length of each phase, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub work_secs: u64,
    pub short_break_secs: u64,
    pub long_break_secs: u64,
}

impl PhaseDurations {
    /// Build from minute values, rejecting any zero length.
    pub fn from_minutes(work: u32, short_break: u32, long_break: u32) -> Result<Self, ValidationError> {
        if work == 0 || short_break == 0 || long_break == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        Ok(Self {
            work_secs: u64::from(work).saturating_mul(60),
            short_break_secs: u64::from(short_break).saturating_mul(60),
            long_break_secs: u64::from(long_break).saturating_mul(60),
        })
    }

    /// Durations from the `[schedule]` section; invalid values fall back to defaults.
    pub fn from_config(config: &Config) -> Self {
        let s = &config.schedule;
        Self::from_minutes(s.focus_duration, s.short_break, s.long_break).unwrap_or_else(|err| {
            tracing::warn!(%err, "invalid schedule durations, using defaults");
            Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.work_secs == 0 || self.short_break_secs == 0 || self.long_break_secs == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        Ok(())
    }

    pub fn for_phase(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_secs,
            Phase::ShortBreak => self.short_break_secs,
            Phase::LongBreak => self.long_break_secs,
        }
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
        }
    }
}
