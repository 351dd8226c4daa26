//! Consecutive-day streak accounting.
//!
//! Everything here is a pure function of its inputs. "Today" is always an
//! explicit `anchor` argument; nothing reads the system clock.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Completion dates of one habit. Ordered and duplicate-free by construction.
pub type DateSet = BTreeSet<NaiveDate>;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streaks {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Parse a canonical `YYYY-MM-DD` date.
///
/// Anything that does not format back to the exact input (`2024-1-5`,
/// surrounding whitespace, a time suffix) is rejected.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .filter(|d| format_date(*d) == s)
        .ok_or_else(|| ValidationError::InvalidDate(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Current and longest streak of `dates` as seen from `anchor`.
///
/// The current streak only counts if its last day is the anchor or the day
/// before; otherwise it has lapsed and is 0, though it still counts toward
/// the longest.
pub fn compute_streaks<I>(dates: I, anchor: NaiveDate) -> Streaks
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut sorted: Vec<NaiveDate> = dates.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();

    let Some((&first, rest)) = sorted.split_first() else {
        return Streaks::default();
    };

    let mut prev = first;
    let mut run: u32 = 1;
    let mut longest: u32 = 1;
    for &date in rest {
        if date == prev {
            continue;
        }
        if prev.succ_opt() == Some(date) {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
        prev = date;
    }

    let live = prev == anchor || anchor.pred_opt() == Some(prev);
    Streaks {
        current_streak: if live { run } else { 0 },
        longest_streak: longest,
    }
}

/// Insert `date` if absent, remove it if present, then recompute.
pub fn toggle_date(dates: &DateSet, date: NaiveDate, anchor: NaiveDate) -> (DateSet, Streaks) {
    let mut updated = dates.clone();
    if !updated.remove(&date) {
        updated.insert(date);
    }
    let streaks = compute_streaks(updated.iter().copied(), anchor);
    (updated, streaks)
}

/// [`toggle_date`] for a raw date string; non-canonical input is rejected
/// and `dates` is left as it was.
pub fn toggle_completion(
    dates: &DateSet,
    date: &str,
    anchor: NaiveDate,
) -> Result<(DateSet, Streaks), ValidationError> {
    let date = parse_date(date)?;
    Ok(toggle_date(dates, date, anchor))
}
