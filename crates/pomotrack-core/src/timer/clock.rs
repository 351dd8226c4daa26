//! Countdown clock for the active phase.
//!
//! The clock never schedules anything. The caller feeds it elapsed seconds
//! via `advance()`; completion is reported exactly once per run.
//!
//! ```ignore
//! let mut clock = Clock::new(1500)?;
//! clock.resume();
//! // once per tick:
//! if let Some(done) = clock.advance(1)? { /* hand to the controller */ }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default phase length when no hand-off pair is supplied (25 minutes).
pub const DEFAULT_SESSION_SECS: u64 = 1500;

/// Returned by [`Clock::advance`] the first time remaining time hits zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSignal {
    pub total_seconds: u64,
}

/// Only built through its constructors, which keep `total_seconds` above zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clock {
    total_seconds: u64,
    remaining_seconds: u64,
    running: bool,
    /// Set once the completion signal for this run has been handed out.
    signaled: bool,
}

impl Clock {
    /// A paused clock holding a full `total_seconds` countdown.
    pub fn new(total_seconds: u64) -> Result<Self, ValidationError> {
        if total_seconds == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        Ok(Self {
            total_seconds,
            remaining_seconds: total_seconds,
            running: false,
            signaled: false,
        })
    }

    /// Restore a clock handed over from another view.
    ///
    /// `None` falls back to a fresh 25 minute countdown. The restored clock
    /// is paused; a pair already at zero completes on the next running tick.
    pub fn from_handoff(pair: Option<(u64, u64)>) -> Result<Self, ValidationError> {
        let (remaining, total) = pair.unwrap_or((DEFAULT_SESSION_SECS, DEFAULT_SESSION_SECS));
        if total == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        if remaining > total {
            return Err(ValidationError::RemainingExceedsTotal { remaining, total });
        }
        Ok(Self {
            total_seconds: total,
            remaining_seconds: remaining,
            running: false,
            signaled: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_signaled(&self) -> bool {
        self.signaled
    }

    /// 0.0 .. 1.0 progress within the current run.
    pub fn progress(&self) -> f64 {
        1.0 - (self.remaining_seconds as f64 / self.total_seconds as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Subtract `delta_seconds`, flooring at zero.
    ///
    /// Negative deltas are rejected without touching any state. Advancing a
    /// paused clock, or one that already signaled, yields `Ok(None)`.
    pub fn advance(&mut self, delta_seconds: i64) -> Result<Option<CompletionSignal>, ValidationError> {
        if delta_seconds < 0 {
            return Err(ValidationError::NegativeDelta(delta_seconds));
        }
        if !self.running || self.signaled {
            return Ok(None);
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(delta_seconds as u64);
        if self.remaining_seconds == 0 {
            self.signaled = true;
            return Ok(Some(CompletionSignal {
                total_seconds: self.total_seconds,
            }));
        }
        Ok(None)
    }

    /// Start a fresh run of `total_seconds`. The clock is left running.
    pub fn reset(&mut self, total_seconds: u64) -> Result<(), ValidationError> {
        if total_seconds == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        self.total_seconds = total_seconds;
        self.remaining_seconds = total_seconds;
        self.running = true;
        self.signaled = false;
        Ok(())
    }

    /// Returns `true` if the clock was running.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Returns `true` if the clock was paused.
    pub fn resume(&mut self) -> bool {
        !std::mem::replace(&mut self.running, true)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            total_seconds: DEFAULT_SESSION_SECS,
            remaining_seconds: DEFAULT_SESSION_SECS,
            running: false,
            signaled: false,
        }
    }
}
