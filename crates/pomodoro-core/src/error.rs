//! Core error types for pomodoro-core.
//!
//! Every command either succeeds or is a clean no-op, so none of these are
//! fatal. Validation errors reject a command before it mutates anything;
//! persistence errors are reported as warnings while the in-memory state
//! stays authoritative.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomodoro-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Command input was rejected
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Durable storage could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Rejected command input. The command becomes a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task name was empty after trimming
    #[error("Task name must not be empty")]
    EmptyTaskName,

    /// Estimate was not a finite integer >= 1
    #[error("Invalid estimate '{0}': expected a whole number of pomodoros >= 1")]
    InvalidEstimate(String),

    /// Unknown timer mode name
    #[error("Unknown mode '{0}': expected pomodoro, shortBreak or longBreak")]
    UnknownMode(String),
}

/// Storage failures. Never abort a command; surfaced as warnings.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SQLite failure
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// State could not be serialized
    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Storage backend refused the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistenceError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
