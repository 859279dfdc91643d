//! Core error types for deepwork-core.
//!
//! The timer engine itself never returns errors: every failure below is either
//! recovered locally (logged and replaced with a default) or surfaced only by
//! the explicit storage and configuration APIs.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for deepwork-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Read of a key failed
    #[error("Failed to read key '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Write of a key failed
    #[error("Failed to write key '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// The store lock was poisoned by a panicking holder
    #[error("Store lock poisoned")]
    Poisoned,

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Stored value could not be encoded or decoded
    #[error("Invalid JSON for key '{key}': {source}")]
    InvalidJson {
        key: String,
        #[source]
        source: serde_json::Error,
    },
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home/data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_converts_into_core_error() {
        let err: CoreError = StoreError::Poisoned.into();
        assert_eq!(err.to_string(), "Store error: Store lock poisoned");
    }

    #[test]
    fn invalid_value_message_names_key() {
        let err = ConfigError::InvalidValue {
            key: "workDuration".into(),
            message: "must be positive".into(),
        };
        assert!(err.to_string().contains("'workDuration'"));
    }
}
