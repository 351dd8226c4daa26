//! Focus cycle state machine.
//!
//! Sits on top of a [`Clock`] and decides which phase runs next whenever
//! the clock reports completion.
//!
//! ## Transitions
//!
//! ```text
//! Work --(n % interval != 0)--> ShortBreak --> Work
//! Work --(n % interval == 0)--> LongBreak  --> Work
//! ```
//!
//! `n` is the number of completed work intervals, counted when a work phase
//! completes. There is no terminal state.

use serde::{Deserialize, Serialize};

use super::clock::{Clock, CompletionSignal};
use super::phase::{Phase, PhaseDurations};
use crate::error::{ConfigError, Result, ValidationError};
use crate::events::Event;
use crate::storage::Config;

pub const DEFAULT_LONG_BREAK_INTERVAL: u64 = 4;

/// Work-interval bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleState {
    completed_work_intervals: u64,
    long_break_interval: u64,
}

impl CycleState {
    pub fn new(long_break_interval: i64) -> Result<Self, ConfigError> {
        Ok(Self {
            completed_work_intervals: 0,
            long_break_interval: validate_interval(long_break_interval)?,
        })
    }

    pub fn completed_work_intervals(&self) -> u64 {
        self.completed_work_intervals
    }

    pub fn long_break_interval(&self) -> u64 {
        self.long_break_interval
    }

    /// Replace the cadence. Rejected values leave the previous one in place.
    ///
    /// The new value is consulted at the next work completion; past
    /// completions are never re-evaluated.
    pub fn set_long_break_interval(&mut self, value: i64) -> Result<(), ConfigError> {
        self.long_break_interval = validate_interval(value)?;
        Ok(())
    }

    /// Phase following `current`, counting a completed work interval if needed.
    pub fn next_phase(&mut self, current: Phase) -> Phase {
        match current {
            Phase::Work => {
                self.completed_work_intervals += 1;
                if self.completed_work_intervals % self.long_break_interval == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        }
    }
}

impl Default for CycleState {
    fn default() -> Self {
        Self {
            completed_work_intervals: 0,
            long_break_interval: DEFAULT_LONG_BREAK_INTERVAL,
        }
    }
}

fn validate_interval(value: i64) -> Result<u64, ConfigError> {
    if value < 1 {
        return Err(ConfigError::InvalidValue {
            key: "schedule.pomodoros_before_long_break".into(),
            message: format!("must be at least 1, got {value}"),
        });
    }
    Ok(value as u64)
}

/// Point-in-time view for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub running: bool,
    pub progress: f64,
    pub completed_work_intervals: u64,
    pub long_break_interval: u64,
}

/// Drives the phase cycle from clock completions.
///
/// Owns its clock; the caller supplies every tick via [`tick`](Self::tick).
#[derive(Debug, Clone, Serialize)]
pub struct SessionCycleController {
    phase: Phase,
    cycle: CycleState,
    clock: Clock,
    durations: PhaseDurations,
    auto_advance: bool,
}

impl SessionCycleController {
    /// Start in `Work` with zero completed intervals and a paused clock.
    pub fn new(durations: PhaseDurations, long_break_interval: i64) -> Result<Self> {
        durations.validate()?;
        let cycle = CycleState::new(long_break_interval)?;
        let clock = Clock::new(durations.work_secs)?;
        Ok(Self {
            phase: Phase::Work,
            cycle,
            clock,
            durations,
            auto_advance: true,
        })
    }

    /// Build from the loaded config. A bad cadence falls back to the default of 4.
    pub fn from_config(config: &Config) -> Self {
        let durations = PhaseDurations::from_config(config);
        let cycle = CycleState::new(i64::from(config.schedule.pomodoros_before_long_break))
            .unwrap_or_else(|err| {
                tracing::warn!(%err, "rejecting long break interval, using default");
                CycleState::default()
            });
        Self {
            phase: Phase::Work,
            cycle,
            clock: Clock::new(durations.work_secs).unwrap_or_default(),
            durations,
            auto_advance: config.auto_advance,
        }
    }

    /// Replace the clock with one handed over from another view.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_auto_advance(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn cycle(&self) -> &CycleState {
        &self.cycle
    }

    pub fn durations(&self) -> &PhaseDurations {
        &self.durations
    }

    pub fn completed_work_intervals(&self) -> u64 {
        self.cycle.completed_work_intervals()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            remaining_seconds: self.clock.remaining_seconds(),
            total_seconds: self.clock.total_seconds(),
            running: self.clock.is_running(),
            progress: self.clock.progress(),
            completed_work_intervals: self.cycle.completed_work_intervals(),
            long_break_interval: self.cycle.long_break_interval(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Feed elapsed seconds to the clock.
    ///
    /// Returns `Some(Event::PhaseChanged)` when the tick completed the
    /// current phase.
    pub fn tick(&mut self, delta_seconds: i64) -> Result<Option<Event>, ValidationError> {
        match self.clock.advance(delta_seconds)? {
            Some(signal) => self.on_completion(signal).map(Some),
            None => Ok(None),
        }
    }

    /// Apply the transition rule for a completed phase and restart the clock.
    fn on_completion(&mut self, signal: CompletionSignal) -> Result<Event, ValidationError> {
        let from = self.phase;
        let mut cycle = self.cycle;
        let to = cycle.next_phase(from);
        self.clock.reset(self.durations.for_phase(to))?;
        self.cycle = cycle;
        if !self.auto_advance {
            self.clock.pause();
        }
        self.phase = to;
        tracing::debug!(
            %from,
            %to,
            completed = self.cycle.completed_work_intervals(),
            elapsed_secs = signal.total_seconds,
            "phase completed"
        );
        Ok(Event::PhaseChanged {
            from,
            to,
            completed_work_intervals: self.cycle.completed_work_intervals(),
        })
    }

    /// Manual override: jump straight to `phase`.
    ///
    /// The completed-interval count is untouched and the returned event does
    /// not notify.
    pub fn select_phase(&mut self, phase: Phase) -> Result<Event, ValidationError> {
        let from = self.phase;
        self.clock.reset(self.durations.for_phase(phase))?;
        self.phase = phase;
        tracing::debug!(%from, to = %phase, "phase selected");
        Ok(Event::PhaseSelected { from, to: phase })
    }

    pub fn start(&mut self) -> Option<Event> {
        self.resume()
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.clock.pause().then(|| Event::ClockPaused {
            remaining_seconds: self.clock.remaining_seconds(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.clock.resume().then(|| Event::ClockResumed {
            remaining_seconds: self.clock.remaining_seconds(),
        })
    }

    /// Back to a paused `Work` phase with no completed intervals.
    pub fn reset_cycle(&mut self) -> Result<Event, ValidationError> {
        self.clock.reset(self.durations.work_secs)?;
        self.clock.pause();
        self.phase = Phase::Work;
        self.cycle = CycleState {
            completed_work_intervals: 0,
            long_break_interval: self.cycle.long_break_interval,
        };
        Ok(Event::CycleReset)
    }

    /// Change the long break cadence; invalid values keep the current one.
    pub fn set_long_break_interval(&mut self, value: i64) -> Result<(), ConfigError> {
        self.cycle.set_long_break_interval(value).inspect_err(|err| {
            tracing::warn!(%err, kept = self.cycle.long_break_interval(), "long break interval rejected");
        })
    }

    /// New durations apply from the next clock reset.
    pub fn set_durations(&mut self, durations: PhaseDurations) -> Result<(), ValidationError> {
        durations.validate()?;
        self.durations = durations;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(interval: i64) -> SessionCycleController {
        let durations = PhaseDurations {
            work_secs: 10,
            short_break_secs: 3,
            long_break_secs: 6,
        };
        let mut c = SessionCycleController::new(durations, interval).unwrap();
        c.start();
        c
    }

    /// Tick until the current phase completes.
    fn finish_phase(c: &mut SessionCycleController) -> Event {
        let secs = c.clock().remaining_seconds() as i64;
        c.tick(secs).unwrap().expect("phase should complete")
    }

    #[test]
    fn starts_in_work() {
        let c = controller(4);
        assert_eq!(c.phase(), Phase::Work);
        assert_eq!(c.completed_work_intervals(), 0);
        assert_eq!(c.clock().total_seconds(), 10);
    }

    #[test]
    fn four_work_completions_end_in_long_break() {
        let mut c = controller(4);
        let mut after_work = Vec::new();
        for _ in 0..4 {
            assert_eq!(c.phase(), Phase::Work);
            finish_phase(&mut c);
            after_work.push(c.phase());
            finish_phase(&mut c);
        }
        assert_eq!(
            after_work,
            vec![
                Phase::ShortBreak,
                Phase::ShortBreak,
                Phase::ShortBreak,
                Phase::LongBreak
            ]
        );
        assert_eq!(c.completed_work_intervals(), 4);
    }

    #[test]
    fn completion_emits_phase_changed_and_resets_clock() {
        let mut c = controller(4);
        assert_eq!(c.tick(4).unwrap(), None);
        let event = c.tick(6).unwrap();
        assert_eq!(
            event,
            Some(Event::PhaseChanged {
                from: Phase::Work,
                to: Phase::ShortBreak,
                completed_work_intervals: 1,
            })
        );
        assert_eq!(c.clock().total_seconds(), 3);
        assert_eq!(c.clock().remaining_seconds(), 3);
        assert!(c.clock().is_running());
    }

    #[test]
    fn interval_of_one_always_long_break() {
        let mut c = controller(1);
        for n in 1..=3 {
            finish_phase(&mut c);
            assert_eq!(c.phase(), Phase::LongBreak);
            assert_eq!(c.completed_work_intervals(), n);
            finish_phase(&mut c);
            assert_eq!(c.phase(), Phase::Work);
        }
    }

    #[test]
    fn invalid_interval_rejected_and_previous_kept() {
        assert!(SessionCycleController::new(PhaseDurations::default(), 0).is_err());

        let mut c = controller(3);
        assert!(c.set_long_break_interval(0).is_err());
        assert!(c.set_long_break_interval(-2).is_err());
        assert_eq!(c.cycle().long_break_interval(), 3);
    }

    #[test]
    fn interval_change_applies_on_next_evaluation_only() {
        let mut c = controller(4);
        finish_phase(&mut c); // work #1 -> short
        finish_phase(&mut c); // -> work
        finish_phase(&mut c); // work #2 -> short
        assert_eq!(c.phase(), Phase::ShortBreak);

        c.set_long_break_interval(3).unwrap();
        assert_eq!(c.phase(), Phase::ShortBreak);
        finish_phase(&mut c); // -> work
        finish_phase(&mut c); // work #3, 3 % 3 == 0
        assert_eq!(c.phase(), Phase::LongBreak);
    }

    #[test]
    fn manual_selection_keeps_count_and_does_not_notify() {
        let mut c = controller(4);
        finish_phase(&mut c);
        assert_eq!(c.completed_work_intervals(), 1);

        let event = c.select_phase(Phase::LongBreak).unwrap();
        assert!(!event.notifies());
        assert_eq!(c.phase(), Phase::LongBreak);
        assert_eq!(c.completed_work_intervals(), 1);
        assert_eq!(c.clock().remaining_seconds(), 6);

        // Selecting Work and finishing it counts normally.
        c.select_phase(Phase::Work).unwrap();
        finish_phase(&mut c);
        assert_eq!(c.completed_work_intervals(), 2);
    }

    #[test]
    fn paused_controller_ignores_ticks() {
        let mut c = controller(4);
        assert!(c.pause().is_some());
        assert!(c.pause().is_none());
        assert_eq!(c.tick(100).unwrap(), None);
        assert_eq!(c.clock().remaining_seconds(), 10);
        assert!(c.resume().is_some());
    }

    #[test]
    fn negative_tick_reports_error() {
        let mut c = controller(4);
        c.tick(3).unwrap();
        assert_eq!(c.tick(-1), Err(ValidationError::NegativeDelta(-1)));
        assert_eq!(c.clock().remaining_seconds(), 7);
        assert_eq!(c.phase(), Phase::Work);
    }

    #[test]
    fn auto_advance_off_leaves_next_phase_paused() {
        let mut c = controller(4).with_auto_advance(false);
        finish_phase(&mut c);
        assert_eq!(c.phase(), Phase::ShortBreak);
        assert!(!c.clock().is_running());
        assert_eq!(c.tick(100).unwrap(), None);
    }

    #[test]
    fn reset_cycle_returns_to_idle_work() {
        let mut c = controller(2);
        finish_phase(&mut c);
        finish_phase(&mut c);
        finish_phase(&mut c);
        assert_eq!(c.phase(), Phase::LongBreak);

        assert_eq!(c.reset_cycle().unwrap(), Event::CycleReset);
        let snap = c.snapshot();
        assert_eq!(snap.phase, Phase::Work);
        assert_eq!(snap.completed_work_intervals, 0);
        assert_eq!(snap.long_break_interval, 2);
        assert!(!snap.running);
        assert_eq!(snap.remaining_seconds, 10);
    }

    #[test]
    fn handoff_clock_is_used_for_the_first_phase() {
        let clock = Clock::from_handoff(Some((2, 10))).unwrap();
        let mut c = SessionCycleController::new(PhaseDurations::default(), 4)
            .unwrap()
            .with_clock(clock);
        c.start();
        assert_eq!(c.tick(1).unwrap(), None);
        assert!(c.tick(1).unwrap().is_some());
        assert_eq!(c.phase(), Phase::ShortBreak);
        assert_eq!(c.clock().total_seconds(), 300);
    }

    #[test]
    fn from_config_falls_back_to_default_interval() {
        let mut cfg = Config::default();
        cfg.schedule.pomodoros_before_long_break = 0;
        let c = SessionCycleController::from_config(&cfg);
        assert_eq!(c.cycle().long_break_interval(), DEFAULT_LONG_BREAK_INTERVAL);
        assert_eq!(c.clock().total_seconds(), 25 * 60);
    }
}
