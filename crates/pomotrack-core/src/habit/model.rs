//! Habits and the owned collection they live in.
//!
//! Collection operations never mutate in place: each returns the updated
//! collection, so a rejected operation leaves the caller's value untouched.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::streak::{compute_streaks, format_date, parse_date, toggle_date, DateSet, Streaks};
use crate::error::{HabitError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_dates")]
    completed_dates: DateSet,
    current_streak: u32,
    longest_streak: u32,
}

fn serialize_dates<S>(dates: &DateSet, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(dates.iter().map(|d| format_date(*d)))
}

impl Habit {
    /// A fresh habit with a random id, no completions and zero streaks.
    pub fn new(name: &str, created_at: DateTime<Utc>) -> Result<Self, HabitError> {
        Self::with_id(uuid::Uuid::new_v4().to_string(), name, created_at)
    }

    pub fn with_id(id: String, name: &str, created_at: DateTime<Utc>) -> Result<Self, HabitError> {
        Ok(Self {
            id,
            name: normalize_name(name)?,
            created_at,
            completed_dates: DateSet::new(),
            current_streak: 0,
            longest_streak: 0,
        })
    }

    /// Rebuild a habit from stored parts; streaks are recomputed for `anchor`.
    pub fn restore(
        id: String,
        name: String,
        created_at: DateTime<Utc>,
        completed_dates: DateSet,
        anchor: NaiveDate,
    ) -> Self {
        let mut habit = Self {
            id,
            name,
            created_at,
            completed_dates,
            current_streak: 0,
            longest_streak: 0,
        };
        habit.recompute(anchor);
        habit
    }

    pub fn completed_dates(&self) -> &DateSet {
        &self.completed_dates
    }

    pub fn completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    pub fn streaks(&self) -> Streaks {
        Streaks {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
        }
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    /// Copy of this habit with `date` toggled.
    pub fn toggled(&self, date: NaiveDate, anchor: NaiveDate) -> Self {
        let (completed_dates, streaks) = toggle_date(&self.completed_dates, date, anchor);
        Self {
            completed_dates,
            current_streak: streaks.current_streak,
            longest_streak: streaks.longest_streak,
            ..self.clone()
        }
    }

    fn recompute(&mut self, anchor: NaiveDate) {
        let streaks = compute_streaks(self.completed_dates.iter().copied(), anchor);
        self.current_streak = streaks.current_streak;
        self.longest_streak = streaks.longest_streak;
    }
}

fn normalize_name(name: &str) -> Result<String, HabitError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HabitError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// All habits, in creation order. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HabitCollection {
    habits: Vec<Habit>,
}

impl HabitCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from existing habits, rejecting duplicate ids.
    pub fn from_habits(habits: Vec<Habit>) -> Result<Self, HabitError> {
        let mut seen = std::collections::HashSet::new();
        for habit in &habits {
            if !seen.insert(habit.id.as_str()) {
                return Err(HabitError::DuplicateId(habit.id.clone()));
            }
        }
        Ok(Self { habits })
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// Look up by exact id, or by an unambiguous id prefix.
    pub fn resolve(&self, key: &str) -> Result<&Habit, HabitError> {
        if let Some(habit) = self.get(key) {
            return Ok(habit);
        }
        let mut matches = self.habits.iter().filter(|h| !key.is_empty() && h.id.starts_with(key));
        match (matches.next(), matches.next()) {
            (Some(habit), None) => Ok(habit),
            _ => Err(HabitError::NotFound(key.to_string())),
        }
    }

    /// Append a habit.
    pub fn with_habit(&self, habit: Habit) -> Result<Self, HabitError> {
        if self.get(&habit.id).is_some() {
            return Err(HabitError::DuplicateId(habit.id));
        }
        let mut next = self.clone();
        next.habits.push(habit);
        Ok(next)
    }

    pub fn without(&self, id: &str) -> Result<(Self, Habit), HabitError> {
        let idx = self.index_of(id)?;
        let mut next = self.clone();
        let removed = next.habits.remove(idx);
        Ok((next, removed))
    }

    pub fn with_renamed(&self, id: &str, name: &str) -> Result<Self, HabitError> {
        let idx = self.index_of(id)?;
        let name = normalize_name(name)?;
        let mut next = self.clone();
        next.habits[idx].name = name;
        Ok(next)
    }

    /// Toggle `date` on habit `id`; `date` must be canonical `YYYY-MM-DD`.
    pub fn with_toggled(&self, id: &str, date: &str, anchor: NaiveDate) -> Result<(Self, Streaks)> {
        let idx = self.index_of(id)?;
        let date = parse_date(date)?;
        let mut next = self.clone();
        next.habits[idx] = self.habits[idx].toggled(date, anchor);
        let streaks = next.habits[idx].streaks();
        Ok((next, streaks))
    }

    /// Every habit's streaks recomputed for a new anchor.
    pub fn refreshed(&self, anchor: NaiveDate) -> Self {
        let mut next = self.clone();
        for habit in &mut next.habits {
            habit.recompute(anchor);
        }
        next
    }

    fn index_of(&self, id: &str) -> Result<usize, HabitError> {
        self.habits
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| HabitError::NotFound(id.to_string()))
    }
}

impl<'a> IntoIterator for &'a HabitCollection {
    type Item = &'a Habit;
    type IntoIter = std::slice::Iter<'a, Habit>;

    fn into_iter(self) -> Self::IntoIter {
        self.habits.iter()
    }
}
