use serde::{Deserialize, Serialize};

use super::TimerMode;

/// Whether the countdown is idle, counting or held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Ready,
    Running,
    Paused,
}

impl TimerStatus {
    pub fn label(self) -> &'static str {
        match self {
            TimerStatus::Ready => "Ready",
            TimerStatus::Running => "Running",
            TimerStatus::Paused => "Paused",
        }
    }
}

/// Snapshot of the countdown owned by [`TimerEngine`](super::TimerEngine).
///
/// `is_running` and `is_paused` are never both true; both false means ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Seconds remaining in the current interval.
    pub time_left: u64,
    pub is_running: bool,
    pub is_paused: bool,
    pub mode: TimerMode,
    /// Finished work intervals; breaks never count.
    pub sessions_completed: u32,
}

impl TimerState {
    /// Ready state at the top of a work interval.
    pub fn ready(work_secs: u64) -> Self {
        Self {
            time_left: work_secs,
            is_running: false,
            is_paused: false,
            mode: TimerMode::Work,
            sessions_completed: 0,
        }
    }

    pub fn status(&self) -> TimerStatus {
        match (self.is_running, self.is_paused) {
            (true, _) => TimerStatus::Running,
            (false, true) => TimerStatus::Paused,
            (false, false) => TimerStatus::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status() == TimerStatus::Ready
    }
}
