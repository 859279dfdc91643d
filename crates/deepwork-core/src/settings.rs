//! Timer settings and the provider that loads them from the key-value store.
//!
//! Validation is all-or-nothing: a stored record with any missing, zero,
//! negative, fractional or non-numeric field is discarded in favour of
//! [`TimerSettings::default`]. Fields are never merged individually.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::storage::{KeyValueStore, SETTINGS_KEY};
use crate::timer::TimerMode;

/// Durations (minutes) and long-break cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    pub work_duration: u32,
    pub break_duration: u32,
    pub long_break_duration: u32,
    pub sessions_until_long_break: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_duration: 25,
            break_duration: 5,
            long_break_duration: 15,
            sessions_until_long_break: 4,
        }
    }
}

const FIELDS: [&str; 4] = [
    "workDuration",
    "breakDuration",
    "longBreakDuration",
    "sessionsUntilLongBreak",
];

impl TimerSettings {
    /// Configured length of `mode` in minutes.
    pub fn duration_min(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_duration,
            TimerMode::Break => self.break_duration,
            TimerMode::LongBreak => self.long_break_duration,
        }
    }

    /// Total countdown for `mode` in seconds.
    pub fn duration_secs(&self, mode: TimerMode) -> u64 {
        u64::from(self.duration_min(mode)).saturating_mul(60)
    }

    /// Check that every field is a positive integer.
    ///
    /// # Errors
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            self.work_duration,
            self.break_duration,
            self.long_break_duration,
            self.sessions_until_long_break,
        ];
        for (key, value) in FIELDS.iter().zip(values) {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: (*key).to_string(),
                    message: "must be a positive integer".into(),
                });
            }
        }
        Ok(())
    }

    /// Parse a raw stored value, rejecting it wholesale if any field is bad.
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        let obj = value.as_object().ok_or_else(|| ConfigError::InvalidValue {
            key: SETTINGS_KEY.into(),
            message: "expected an object".into(),
        })?;

        let mut fields = [0u32; 4];
        for (slot, key) in fields.iter_mut().zip(FIELDS) {
            *slot = obj
                .get(key)
                .and_then(Value::as_u64)
                .filter(|n| *n > 0)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "missing or not a positive integer".into(),
                })?;
        }

        Ok(Self {
            work_duration: fields[0],
            break_duration: fields[1],
            long_break_duration: fields[2],
            sessions_until_long_break: fields[3],
        })
    }
}

/// Reads and writes [`TimerSettings`] under [`SETTINGS_KEY`].
#[derive(Clone)]
pub struct SettingsProvider {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsProvider {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load settings, falling back to defaults when absent, unreadable or malformed.
    pub fn load(&self) -> TimerSettings {
        match self.store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => match TimerSettings::from_json(&raw) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(error = %e, "stored timer settings are malformed; using defaults");
                    TimerSettings::default()
                }
            },
            Ok(None) => {
                debug!("no stored timer settings; using defaults");
                TimerSettings::default()
            }
            Err(e) => {
                warn!(error = %e, "failed to read timer settings; using defaults");
                TimerSettings::default()
            }
        }
    }

    /// Persist `settings`.
    ///
    /// # Errors
    /// Rejects invalid settings without writing, and propagates store failures.
    pub fn save(&self, settings: &TimerSettings) -> crate::error::Result<()> {
        settings.validate()?;
        let value = serde_json::to_value(settings)?;
        self.store.set(SETTINGS_KEY, &value)?;
        Ok(())
    }
}
