//! Core error types for pomotrack-core.
//!
//! Every fallible core operation returns one of these through `Result`;
//! rejected input never mutates state.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomotrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid caller input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Snapshot load/save errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Habit collection errors
    #[error("Habit error: {0}")]
    Habit(#[from] HabitError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Invalid input handed to a core operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Clock advanced by a negative delta
    #[error("Tick delta must be non-negative, got {0}")]
    NegativeDelta(i64),

    /// Date string not in canonical YYYY-MM-DD form
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Phase duration must be positive
    #[error("Duration must be greater than zero")]
    ZeroDuration,

    /// Hand-off pair with remaining > total
    #[error("Remaining time {remaining}s exceeds total {total}s")]
    RemainingExceedsTotal { remaining: u64, total: u64 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Persistence adapter and snapshot errors.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Storage medium could not be read
    #[error("Failed to read snapshot from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Storage medium rejected the write
    #[error("Failed to write snapshot to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes do not decode into valid habit records
    #[error("Corrupt habit snapshot: {0}")]
    Corrupt(String),

    /// Encoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Habit collection errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HabitError {
    /// No habit with the given id
    #[error("Habit not found: {0}")]
    NotFound(String),

    /// Two habits share an id
    #[error("Duplicate habit id: {0}")]
    DuplicateId(String),

    /// Name is empty after trimming
    #[error("Habit name must not be empty")]
    EmptyName,
}

impl PersistenceError {
    /// True for errors raised while decoding or reading a snapshot.
    pub fn is_read_error(&self) -> bool {
        matches!(
            self,
            PersistenceError::ReadFailed { .. } | PersistenceError::Corrupt(_)
        )
    }

    /// True when the bytes were read but do not decode as a snapshot.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, PersistenceError::Corrupt(_) | PersistenceError::Json(_))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
