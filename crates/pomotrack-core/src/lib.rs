//! # pomotrack Core Library
//!
//! Core logic for the pomotrack focus timer and habit tracker. The CLI binary
//! is a thin layer over this crate; any other front end would be too.
//!
//! ## Architecture
//!
//! - **Timer**: a countdown [`Clock`] that is advanced by the caller, and a
//!   [`SessionCycleController`] that picks the next phase on completion
//! - **Habits**: a pure streak engine over sets of completion dates, plus an
//!   owned [`HabitCollection`]
//! - **Storage**: a byte-level [`PersistenceAdapter`], the JSON habit
//!   snapshot, and TOML configuration
//! - **Notify**: the seam where phase-change events leave the core
//!
//! Nothing in this crate reads the wall clock or schedules work; "now",
//! "today" and every tick come from the caller.

pub mod error;
pub mod events;
pub mod habit;
pub mod notify;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, HabitError, PersistenceError, ValidationError};
pub use events::Event;
pub use habit::{compute_streaks, toggle_completion, Habit, HabitCollection, Streaks};
pub use notify::NotificationDispatcher;
pub use storage::{Config, FileAdapter, HabitStore, MemoryAdapter, PersistenceAdapter};
pub use timer::{Clock, CycleState, Phase, PhaseDurations, SessionCycleController};
