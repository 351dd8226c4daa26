use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change of the focus cycle produces an Event.
/// The UI renders from them; the notification dispatcher is offered
/// only the ones for which [`Event::notifies`] is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Event {
    /// Automatic transition after the clock ran out.
    PhaseChanged {
        from: Phase,
        to: Phase,
        completed_work_intervals: u64,
    },
    /// User picked a phase directly.
    PhaseSelected {
        from: Phase,
        to: Phase,
    },
    ClockPaused {
        remaining_seconds: u64,
    },
    ClockResumed {
        remaining_seconds: u64,
    },
    CycleReset,
}

impl Event {
    /// Whether this event should reach the notification dispatcher.
    pub fn notifies(&self) -> bool {
        matches!(self, Event::PhaseChanged { .. })
    }
}
