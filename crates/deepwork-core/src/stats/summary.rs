use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::period::{filter_sessions, StatsPeriod};
use crate::format::format_duration;
use crate::session::DeepWorkSession;

/// Count and summed duration of the completed sessions in a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub count: usize,
    pub total_duration_ms: u64,
}

impl PeriodSummary {
    pub fn total_duration_label(&self) -> String {
        format_duration(self.total_duration_ms)
    }
}

pub fn summarize<Tz: TimeZone>(
    sessions: &[DeepWorkSession],
    period: StatsPeriod,
    now: &DateTime<Tz>,
) -> PeriodSummary {
    filter_sessions(sessions, period, now)
        .into_iter()
        .fold(PeriodSummary::default(), |acc, s| PeriodSummary {
            count: acc.count + 1,
            total_duration_ms: acc.total_duration_ms.saturating_add(s.duration),
        })
}

/// All four headline summaries at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub total: PeriodSummary,
    pub today: PeriodSummary,
    pub week: PeriodSummary,
    pub month: PeriodSummary,
}

impl StatsReport {
    pub fn build<Tz: TimeZone>(sessions: &[DeepWorkSession], now: &DateTime<Tz>) -> Self {
        Self {
            total: summarize(sessions, StatsPeriod::All, now),
            today: summarize(sessions, StatsPeriod::Today, now),
            week: summarize(sessions, StatsPeriod::Week, now),
            month: summarize(sessions, StatsPeriod::Month, now),
        }
    }

    pub fn get(&self, period: StatsPeriod) -> PeriodSummary {
        match period {
            StatsPeriod::Today => self.today,
            StatsPeriod::Week => self.week,
            StatsPeriod::Month => self.month,
            StatsPeriod::All => self.total,
        }
    }
}
