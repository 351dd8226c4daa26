//! Habit collection bound to a persistence adapter.
//!
//! The in-memory collection is authoritative. Every successful mutation is
//! followed by a full snapshot save; a failed save is reported on the
//! outcome and retried implicitly by the next mutation's save. A snapshot
//! that failed to decode is set aside by the adapter before the first save
//! replaces it.

use chrono::{DateTime, NaiveDate, Utc};

use super::adapter::PersistenceAdapter;
use super::snapshot::{decode_habits, encode_habits};
use crate::error::{PersistenceError, Result};
use crate::habit::{Habit, HabitCollection, Streaks};

/// Result of a store mutation.
#[derive(Debug)]
pub struct StoreOutcome<T> {
    pub value: T,
    /// Set when the mutation applied in memory but could not be saved.
    pub save_warning: Option<PersistenceError>,
}

pub struct HabitStore<A: PersistenceAdapter> {
    habits: HabitCollection,
    adapter: A,
    anchor: NaiveDate,
    set_aside_pending: bool,
}

impl<A: PersistenceAdapter> HabitStore<A> {
    /// Load the stored collection, or start empty.
    ///
    /// An unreadable or corrupt snapshot is logged and returned as a
    /// warning; the store then starts from an empty collection.
    pub fn open(adapter: A, anchor: NaiveDate) -> (Self, Option<PersistenceError>) {
        let loaded = adapter
            .load()
            .and_then(|bytes| match bytes {
                Some(bytes) => decode_habits(&bytes, anchor),
                None => Ok(HabitCollection::new()),
            });
        let (habits, warning) = match loaded {
            Ok(habits) => (habits, None),
            Err(err) => {
                tracing::warn!(%err, "discarding unreadable habit snapshot");
                (HabitCollection::new(), Some(err))
            }
        };
        tracing::debug!(count = habits.len(), %anchor, "habit store opened");
        let set_aside_pending = warning.as_ref().is_some_and(PersistenceError::is_decode_error);
        (
            Self {
                habits,
                adapter,
                anchor,
                set_aside_pending,
            },
            warning,
        )
    }

    pub fn habits(&self) -> &HabitCollection {
        &self.habits
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Move "today" and recompute every streak. Nothing is saved.
    pub fn set_anchor(&mut self, anchor: NaiveDate) {
        self.anchor = anchor;
        self.habits = self.habits.refreshed(anchor);
    }

    pub fn create(&mut self, name: &str, created_at: DateTime<Utc>) -> Result<StoreOutcome<Habit>> {
        let habit = Habit::new(name, created_at)?;
        let next = self.habits.with_habit(habit.clone())?;
        tracing::info!(id = %habit.id, name = %habit.name, "habit created");
        Ok(self.commit(next, habit))
    }

    pub fn remove(&mut self, id: &str) -> Result<StoreOutcome<Habit>> {
        let (next, removed) = self.habits.without(id)?;
        tracing::info!(id = %removed.id, "habit removed");
        Ok(self.commit(next, removed))
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<StoreOutcome<Habit>> {
        let next = self.habits.with_renamed(id, name)?;
        let renamed = next.get(id).cloned().ok_or_else(|| {
            crate::error::HabitError::NotFound(id.to_string())
        })?;
        Ok(self.commit(next, renamed))
    }

    /// Toggle completion of `date` (canonical `YYYY-MM-DD`) for habit `id`.
    pub fn toggle(&mut self, id: &str, date: &str) -> Result<StoreOutcome<Streaks>> {
        let (next, streaks) = self.habits.with_toggled(id, date, self.anchor)?;
        tracing::debug!(
            id,
            date,
            current = streaks.current_streak,
            longest = streaks.longest_streak,
            "completion toggled"
        );
        Ok(self.commit(next, streaks))
    }

    /// Write the current collection as a full snapshot.
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        let bytes = encode_habits(&self.habits)?;
        if self.set_aside_pending {
            self.adapter.set_aside()?;
            self.set_aside_pending = false;
        }
        self.adapter.save(&bytes)
    }

    fn commit<T>(&mut self, next: HabitCollection, value: T) -> StoreOutcome<T> {
        self.habits = next;
        let save_warning = self.save().err();
        if let Some(err) = &save_warning {
            tracing::warn!(%err, "habit snapshot not saved; keeping in-memory state");
        }
        StoreOutcome {
            value,
            save_warning,
        }
    }
}
