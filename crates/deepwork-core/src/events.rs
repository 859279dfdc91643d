use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::TimerMode;

/// Every state change of the timer produces an Event.
/// Subscribers receive it alongside the resulting state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        time_left: u64,
        /// True when continuing a paused interval.
        resumed: bool,
        at: DateTime<Utc>,
    },
    TimerPaused {
        time_left: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// One second elapsed.
    Ticked {
        time_left: u64,
    },
    /// An interval ran out and the engine moved to the next mode.
    IntervalCompleted {
        completed: TimerMode,
        next: TimerMode,
        sessions_completed: u32,
        /// Id of the logged session, for finished work intervals.
        session_id: Option<String>,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        time_left: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::IntervalCompleted { .. })
    }
}
