mod config;
mod json_file;
mod slot;
mod sqlite;
mod store;

pub use config::{Backend, Config, LogConfig, StorageConfig};
pub use json_file::JsonFileSlot;
pub use slot::{MemorySlot, StateSlot, STATE_KEY};
pub use sqlite::SqliteSlot;
pub use store::{LoadReport, LoadSource, StateStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/pomodoro[-dev]/` based on POMODORO_ENV.
///
/// Set POMODORO_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMODORO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomodoro-dev")
    } else {
        base_dir.join("pomodoro")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
