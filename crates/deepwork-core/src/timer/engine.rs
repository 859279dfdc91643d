//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use internal
//! threads - the caller delivers one `tick()` per elapsed second while the
//! timer is running (see [`TimerController`](super::TimerController)).
//!
//! ## State Transitions
//!
//! ```text
//! Ready -> Running -> Paused -> Running -> (interval ends) -> Ready (next mode)
//!   ^                                                             |
//!   +---------------------------- reset --------------------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(settings, log, Arc::new(SystemClock));
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(Event::IntervalCompleted) when the interval ends
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Clock, TimerMode, TimerState};
use crate::error::ConfigError;
use crate::events::Event;
use crate::session::{DeepWorkSession, SessionLog};
use crate::settings::{SettingsProvider, TimerSettings};
use crate::storage::KeyValueStore;

/// What `reset()` does to the completed-work counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Keep the counter so the long-break cadence survives an accidental reset.
    #[default]
    KeepSessionCount,
    /// Zero the counter along with the countdown.
    ClearSessionCount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub reset_policy: ResetPolicy,
}

/// Core timer engine.
///
/// Owns the countdown state and the start timestamp of the work interval in
/// progress, and appends to the session log when a work interval finishes.
pub struct TimerEngine {
    settings: TimerSettings,
    options: EngineOptions,
    state: TimerState,
    /// Wall-clock start of the current work interval, set on the first start.
    session_started_at: Option<DateTime<Utc>>,
    log: SessionLog,
    clock: Arc<dyn Clock>,
}

impl TimerEngine {
    /// Create a ready engine at the top of a work interval.
    pub fn new(settings: TimerSettings, log: SessionLog, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: TimerState::ready(settings.duration_secs(TimerMode::Work)),
            settings,
            options: EngineOptions::default(),
            session_started_at: None,
            log,
            clock,
        }
    }

    /// Load settings from `store` and log sessions back into it.
    pub fn from_store(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let settings = SettingsProvider::new(Arc::clone(&store)).load();
        Self::new(settings, SessionLog::new(store), clock)
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn settings(&self) -> TimerSettings {
        self.settings
    }

    pub fn session_log(&self) -> &SessionLog {
        &self.log
    }

    pub fn session_started_at(&self) -> Option<DateTime<Utc>> {
        self.session_started_at
    }

    /// Full length of the current mode in seconds.
    pub fn total_secs(&self) -> u64 {
        self.settings.duration_secs(self.state.mode)
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.state.time_left as f64 / total as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state.is_running {
            return None;
        }
        let resumed = self.state.is_paused;
        if !resumed && self.state.mode.is_work() && self.session_started_at.is_none() {
            self.session_started_at = Some(self.clock.now());
        }
        self.state.is_running = true;
        self.state.is_paused = false;
        debug!(mode = ?self.state.mode, time_left = self.state.time_left, resumed, "timer started");
        Some(Event::TimerStarted {
            mode: self.state.mode,
            time_left: self.state.time_left,
            resumed,
            at: self.clock.now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        self.state.is_running = false;
        self.state.is_paused = true;
        debug!(time_left = self.state.time_left, "timer paused");
        Some(Event::TimerPaused {
            time_left: self.state.time_left,
            at: self.clock.now(),
        })
    }

    /// Back to a ready work interval. Any unfinished work interval is discarded.
    pub fn reset(&mut self) -> Option<Event> {
        self.session_started_at = None;
        self.state.mode = TimerMode::Work;
        self.state.time_left = self.settings.duration_secs(TimerMode::Work);
        self.state.is_running = false;
        self.state.is_paused = false;
        if self.options.reset_policy == ResetPolicy::ClearSessionCount {
            self.state.sessions_completed = 0;
        }
        debug!(sessions_completed = self.state.sessions_completed, "timer reset");
        Some(Event::TimerReset {
            at: self.clock.now(),
        })
    }

    /// Apply one elapsed second. No-op unless running.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.is_running {
            return None;
        }
        if self.state.time_left <= 1 {
            return Some(self.complete_interval());
        }
        self.state.time_left -= 1;
        Some(Event::Ticked {
            time_left: self.state.time_left,
        })
    }

    /// Replace the settings. A ready timer picks up the new length immediately;
    /// a running or paused countdown keeps going unchanged.
    ///
    /// # Errors
    /// Rejects settings with a zero field, leaving the current ones in place.
    pub fn set_settings(&mut self, settings: TimerSettings) -> Result<Event, ConfigError> {
        settings.validate()?;
        self.settings = settings;
        if self.state.is_ready() {
            self.state.time_left = settings.duration_secs(self.state.mode);
        }
        Ok(Event::SettingsUpdated {
            time_left: self.state.time_left,
            at: self.clock.now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_interval(&mut self) -> Event {
        let completed = self.state.mode;
        let now = self.clock.now();
        let mut session_id = None;

        if completed.is_work() {
            if let Some(started) = self.session_started_at {
                let session = DeepWorkSession::new_completed(started, now);
                info!(id = %session.id, duration_ms = session.duration, "deep work session completed");
                session_id = Some(session.id.clone());
                if let Err(e) = self.log.append(session) {
                    warn!(
                        error = %e,
                        pending = self.log.pending_count(),
                        "failed to persist session; will retry on next append"
                    );
                }
            }
            self.state.sessions_completed = self.state.sessions_completed.saturating_add(1);
        }

        let next = completed.next(
            self.state.sessions_completed,
            self.settings.sessions_until_long_break,
        );
        self.state.mode = next;
        self.state.time_left = self.settings.duration_secs(next);
        self.state.is_running = false;
        self.state.is_paused = false;
        self.session_started_at = None;

        debug!(?completed, ?next, sessions_completed = self.state.sessions_completed, "interval completed");
        Event::IntervalCompleted {
            completed,
            next,
            sessions_completed: self.state.sessions_completed,
            session_id,
            at: now,
        }
    }
}
