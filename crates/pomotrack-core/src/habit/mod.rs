//! Habit tracking: the habit collection and its streak engine.

mod model;
mod streak;

pub use model::{Habit, HabitCollection};
pub use streak::{
    compute_streaks, format_date, parse_date, toggle_completion, toggle_date, DateSet, Streaks,
};
