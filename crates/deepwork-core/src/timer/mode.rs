use serde::{Deserialize, Serialize};

/// Interval type the timer is counting down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    #[default]
    Work,
    Break,
    LongBreak,
}

impl TimerMode {
    /// Human-readable label shown next to the countdown.
    pub fn label(self) -> &'static str {
        match self {
            TimerMode::Work => "Focus Time",
            TimerMode::Break => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    pub fn is_work(self) -> bool {
        matches!(self, TimerMode::Work)
    }

    /// Mode that follows this one.
    ///
    /// `sessions_completed` is the work counter *after* the interval that just
    /// finished was counted.
    pub fn next(self, sessions_completed: u32, sessions_until_long_break: u32) -> TimerMode {
        match self {
            TimerMode::Work => {
                if sessions_until_long_break > 0
                    && sessions_completed % sessions_until_long_break == 0
                {
                    TimerMode::LongBreak
                } else {
                    TimerMode::Break
                }
            }
            TimerMode::Break | TimerMode::LongBreak => TimerMode::Work,
        }
    }
}
