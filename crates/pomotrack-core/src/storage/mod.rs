mod adapter;
mod config;
mod habit_store;
mod snapshot;

pub use adapter::{FileAdapter, MemoryAdapter, PersistenceAdapter};
pub use config::{Config, NotificationsConfig, ScheduleConfig};
pub use habit_store::{HabitStore, StoreOutcome};
pub use snapshot::{decode_habits, encode_habits, HabitRecord};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `POMOTRACK_DATA_DIR` wins when set; otherwise `~/.config/pomotrack`, or
/// `~/.config/pomotrack-dev` with `POMOTRACK_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("POMOTRACK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("POMOTRACK_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("pomotrack-dev")
            } else {
                base_dir.join("pomotrack")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
