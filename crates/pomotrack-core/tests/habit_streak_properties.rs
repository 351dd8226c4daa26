//! Property tests for the streak engine and the habit collection.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use pomotrack_core::habit::{compute_streaks, format_date, toggle_date, DateSet};
use pomotrack_core::{Habit, HabitCollection};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn day(offset: u16) -> NaiveDate {
    base() + Duration::days(i64::from(offset))
}

proptest! {
    #[test]
    fn toggles_never_produce_duplicates(offsets in prop::collection::vec(0u16..60, 0..80)) {
        let anchor = day(59);
        let mut dates = DateSet::new();
        let mut toggle_counts = std::collections::BTreeMap::<u16, usize>::new();
        for off in &offsets {
            dates = toggle_date(&dates, day(*off), anchor).0;
            *toggle_counts.entry(*off).or_default() += 1;
        }
        // A date is present exactly when it was toggled an odd number of times.
        for (off, count) in toggle_counts {
            prop_assert_eq!(dates.contains(&day(off)), count % 2 == 1);
        }
        let as_vec: Vec<_> = dates.iter().collect();
        let mut deduped = as_vec.clone();
        deduped.dedup();
        prop_assert_eq!(as_vec, deduped);
    }

    #[test]
    fn compute_streaks_is_pure(
        offsets in prop::collection::vec(0u16..400, 0..120),
        anchor in 0u16..420,
    ) {
        let dates: Vec<NaiveDate> = offsets.iter().map(|o| day(*o)).collect();
        let first = compute_streaks(dates.clone(), day(anchor));
        let second = compute_streaks(dates.clone(), day(anchor));
        let mut reversed = dates;
        reversed.reverse();
        let third = compute_streaks(reversed, day(anchor));
        prop_assert_eq!(first, second);
        prop_assert_eq!(first, third);
    }

    #[test]
    fn longest_is_never_below_current(
        offsets in prop::collection::vec(0u16..90, 0..90),
        anchor in 0u16..100,
    ) {
        let s = compute_streaks(offsets.iter().map(|o| day(*o)), day(anchor));
        prop_assert!(s.longest_streak >= s.current_streak);
        prop_assert!(s.longest_streak as usize <= offsets.len());
    }

    #[test]
    fn toggle_twice_is_identity(
        offsets in prop::collection::btree_set(0u16..60, 0..40),
        target in 0u16..60,
    ) {
        let original: DateSet = offsets.iter().map(|o| day(*o)).collect();
        let anchor = day(60);
        let (once, _) = toggle_date(&original, day(target), anchor);
        let (twice, streaks) = toggle_date(&once, day(target), anchor);
        prop_assert_eq!(&twice, &original);
        prop_assert_eq!(streaks, compute_streaks(original.iter().copied(), anchor));
    }

    #[test]
    fn collection_toggles_keep_invariants(
        steps in prop::collection::vec((0usize..3, 0u16..30), 0..60),
    ) {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut habits = HabitCollection::new();
        for name in ["a", "b", "c"] {
            habits = habits.with_habit(Habit::with_id(name.into(), name, created).unwrap()).unwrap();
        }
        let anchor = day(29);
        for (idx, off) in steps {
            let id = ["a", "b", "c"][idx];
            habits = habits.with_toggled(id, &format_date(day(off)), anchor).unwrap().0;
        }
        for habit in &habits {
            prop_assert!(habit.longest_streak() >= habit.current_streak());
            let expected = compute_streaks(habit.completed_dates().iter().copied(), anchor);
            prop_assert_eq!(habit.streaks(), expected);
        }
    }
}
