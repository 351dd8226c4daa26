//! JSON encoding of the habit collection.
//!
//! ```text
//! [{ "id", "name", "createdAt", "completedDates": ["YYYY-MM-DD", ..],
//!    "currentStreak", "longestStreak" }, ..]
//! ```
//!
//! The streak fields are written for readers of the file but ignored on
//! decode; they are always recomputed from `completedDates`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::habit::{format_date, parse_date, DateSet, Habit, HabitCollection};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitRecord {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub completed_dates: Vec<String>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
}

impl From<&Habit> for HabitRecord {
    fn from(habit: &Habit) -> Self {
        Self {
            id: habit.id.clone(),
            name: habit.name.clone(),
            created_at: habit.created_at,
            completed_dates: habit.completed_dates().iter().map(|d| format_date(*d)).collect(),
            current_streak: habit.current_streak(),
            longest_streak: habit.longest_streak(),
        }
    }
}

impl HabitRecord {
    fn into_habit(self, anchor: NaiveDate) -> Result<Habit, PersistenceError> {
        if self.id.is_empty() {
            return Err(PersistenceError::Corrupt("habit with empty id".into()));
        }
        if self.name.trim().is_empty() {
            return Err(PersistenceError::Corrupt(format!("habit {} has no name", self.id)));
        }
        let dates = self
            .completed_dates
            .iter()
            .map(|s| parse_date(s))
            .collect::<Result<DateSet, _>>()
            .map_err(|e| PersistenceError::Corrupt(format!("habit {}: {e}", self.id)))?;

        let habit = Habit::restore(self.id, self.name, self.created_at, dates, anchor);
        if habit.current_streak() != self.current_streak
            || habit.longest_streak() != self.longest_streak
        {
            tracing::debug!(
                id = %habit.id,
                stored_current = self.current_streak,
                stored_longest = self.longest_streak,
                current = habit.current_streak(),
                longest = habit.longest_streak(),
                "stored streaks differ from recomputed values"
            );
        }
        Ok(habit)
    }
}

/// Serialize the whole collection.
pub fn encode_habits(habits: &HabitCollection) -> Result<Vec<u8>, PersistenceError> {
    let records: Vec<HabitRecord> = habits.iter().map(HabitRecord::from).collect();
    Ok(serde_json::to_vec_pretty(&records)?)
}

/// Parse a snapshot, recomputing streaks for `anchor`.
///
/// Any invalid record rejects the whole snapshot.
pub fn decode_habits(bytes: &[u8], anchor: NaiveDate) -> Result<HabitCollection, PersistenceError> {
    let records: Vec<HabitRecord> =
        serde_json::from_slice(bytes).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
    let habits = records
        .into_iter()
        .map(|r| r.into_habit(anchor))
        .collect::<Result<Vec<_>, _>>()?;
    HabitCollection::from_habits(habits).map_err(|e| PersistenceError::Corrupt(e.to_string()))
}
