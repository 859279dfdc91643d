//! # Deepwork Core Library
//!
//! This library provides the core logic for the Deepwork focus timer: a
//! Pomodoro-style countdown that alternates work intervals with short and long
//! breaks and records every finished work interval as a session.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A tick-driven state machine; one `tick()` per elapsed second
//! - **Timer Controller**: Async driver that owns the ticker task and broadcasts updates
//! - **Settings**: Durations and long-break cadence read from the key-value store
//! - **Session Log**: Append-only list of completed work sessions
//! - **Storage**: JSON key-value store (SQLite or in-memory) and TOML app config
//! - **Stats**: Today / week / month / all-time filters and summaries
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerController`]: Ticker and subscription front-end
//! - [`SessionLog`]: Session persistence
//! - [`KeyValueStore`]: Storage seam

pub mod error;
pub mod events;
pub mod format;
pub mod logging;
pub mod session;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, StoreError};
pub use events::Event;
pub use session::{DeepWorkSession, SessionLog};
pub use settings::{SettingsProvider, TimerSettings};
pub use stats::{PeriodSummary, StatsPeriod, StatsReport};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore, SESSIONS_KEY, SETTINGS_KEY};
pub use timer::{
    Clock, EngineOptions, ManualClock, ResetPolicy, SystemClock, TimerController, TimerEngine,
    TimerMode, TimerState, TimerStatus, TimerUpdate,
};
