mod clock;
mod cycle;
mod phase;

pub use clock::{Clock, CompletionSignal, DEFAULT_SESSION_SECS};
pub use cycle::{CycleState, SessionCycleController, SessionSnapshot, DEFAULT_LONG_BREAK_INTERVAL};
pub use phase::{Phase, PhaseDurations};
