use chrono::{Local, NaiveDate, Utc};
use clap::Subcommand;
use pomotrack_core::habit::{format_date, parse_date};
use pomotrack_core::storage::StoreOutcome;
use pomotrack_core::{FileAdapter, Habit, HabitStore};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Print the created habit as JSON
        #[arg(long)]
        json: bool,
    },
    /// List habits with their streaks
    List {
        #[arg(long)]
        json: bool,
        /// Evaluate streaks as of this date (YYYY-MM-DD, default today)
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Show one habit including its completion dates
    Show {
        /// Habit ID or unique ID prefix
        id: String,
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Mark or unmark a day as completed
    Toggle {
        /// Habit ID or unique ID prefix
        id: String,
        /// Day to toggle (YYYY-MM-DD, default the --as-of day)
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        as_of: Option<String>,
    },
    /// Rename a habit
    Rename {
        /// Habit ID or unique ID prefix
        id: String,
        /// New name
        name: String,
    },
    /// Delete a habit
    Remove {
        /// Habit ID or unique ID prefix
        id: String,
    },
}

/// Today in the local calendar unless overridden.
fn anchor_date(as_of: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match as_of {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(Local::now().date_naive()),
    }
}

fn open_store(anchor: NaiveDate) -> Result<HabitStore<FileAdapter>, Box<dyn std::error::Error>> {
    let (store, warning) = HabitStore::open(FileAdapter::open_default()?, anchor);
    if let Some(err) = warning {
        eprintln!("warning: {err}; starting with an empty habit list");
    }
    Ok(store)
}

fn report<T>(outcome: StoreOutcome<T>) -> T {
    if let Some(err) = outcome.save_warning {
        eprintln!("warning: changes kept in memory but not saved: {err}");
    }
    outcome.value
}

fn resolve_id(store: &HabitStore<FileAdapter>, key: &str) -> Result<String, Box<dyn std::error::Error>> {
    Ok(store.habits().resolve(key)?.id.clone())
}

fn print_habit_line(habit: &Habit, anchor: NaiveDate) {
    let mark = if habit.completed_on(anchor) { "x" } else { " " };
    let short_id: String = habit.id.chars().take(8).collect();
    println!(
        "[{mark}] {short_id}  {:<24} current {:>3}  longest {:>3}",
        habit.name,
        habit.current_streak(),
        habit.longest_streak()
    );
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        HabitAction::Add { name, json } => {
            let mut store = open_store(anchor_date(None)?)?;
            let habit = report(store.create(&name, Utc::now())?);
            if json {
                println!("{}", serde_json::to_string_pretty(&habit)?);
            } else {
                println!("Habit created: {} ({})", habit.name, habit.id);
            }
        }
        HabitAction::List { json, as_of } => {
            let anchor = anchor_date(as_of.as_deref())?;
            let store = open_store(anchor)?;
            if json {
                println!("{}", serde_json::to_string_pretty(store.habits())?);
            } else if store.habits().is_empty() {
                println!("No habits yet. Add one with `pomotrack habit add <name>`.");
            } else {
                for habit in store.habits() {
                    print_habit_line(habit, anchor);
                }
            }
        }
        HabitAction::Show { id, as_of } => {
            let store = open_store(anchor_date(as_of.as_deref())?)?;
            let habit = store.habits().resolve(&id)?;
            println!("{}", serde_json::to_string_pretty(habit)?);
        }
        HabitAction::Toggle { id, date, as_of } => {
            let anchor = anchor_date(as_of.as_deref())?;
            let date = date.unwrap_or_else(|| format_date(anchor));
            let mut store = open_store(anchor)?;
            let id = resolve_id(&store, &id)?;
            let streaks = report(store.toggle(&id, &date)?);
            let day = parse_date(&date)?;
            let done = store.habits().get(&id).is_some_and(|h| h.completed_on(day));
            println!(
                "{} {date}: current {}, longest {}",
                if done { "Completed" } else { "Cleared" },
                streaks.current_streak,
                streaks.longest_streak
            );
        }
        HabitAction::Rename { id, name } => {
            let mut store = open_store(anchor_date(None)?)?;
            let id = resolve_id(&store, &id)?;
            let habit = report(store.rename(&id, &name)?);
            println!("Habit renamed: {}", habit.name);
        }
        HabitAction::Remove { id } => {
            let mut store = open_store(anchor_date(None)?)?;
            let id = resolve_id(&store, &id)?;
            let habit = report(store.remove(&id)?);
            println!("Habit removed: {}", habit.name);
        }
    }
    Ok(())
}
