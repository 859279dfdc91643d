//! Key-value persistence for settings and the session log.
//!
//! Values are JSON documents addressed by string key. Two backends exist:
//! [`SqliteStore`] for durable on-disk storage and [`MemoryStore`] for tests
//! and ephemeral runs.

mod config;
mod memory;
mod sqlite;

pub use config::{Config, EngineConfig, LoggingConfig, StorageBackend, StorageConfig};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{ConfigError, StoreError};

/// Key holding the serialized [`TimerSettings`](crate::TimerSettings).
pub const SETTINGS_KEY: &str = "timerSettings";
/// Key holding the ordered list of [`DeepWorkSession`](crate::DeepWorkSession)s.
pub const SESSIONS_KEY: &str = "deepWorkSessions";

/// Synchronous JSON key-value store.
///
/// Implementations must be shareable across the timer task and its callers.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored at `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Overwrite the value stored at `key`.
    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError>;
}

/// Returns `~/.config/deepwork[-dev]/` based on DEEPWORK_ENV.
///
/// Set DEEPWORK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DEEPWORK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("deepwork-dev")
    } else {
        base_dir.join("deepwork")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}

/// Build the store selected by `config`.
///
/// Relative SQLite paths resolve against [`data_dir`].
///
/// # Errors
/// Returns an error if the data directory or database cannot be opened.
pub fn open_store(config: &Config) -> crate::error::Result<Arc<dyn KeyValueStore>> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::Sqlite => {
            let file = &config.storage.sqlite_file;
            let path = if file.is_absolute() {
                file.clone()
            } else {
                data_dir()?.join(file)
            };
            Ok(Arc::new(SqliteStore::open(path)?))
        }
    }
}
