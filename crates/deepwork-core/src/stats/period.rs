use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::session::DeepWorkSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Today,
    /// Since the most recent Sunday midnight.
    Week,
    Month,
    All,
}

impl StatsPeriod {
    /// Local instant the period begins at, `None` for all time.
    pub fn start<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let today = now.date_naive();
        let date = match self {
            StatsPeriod::Today => today,
            StatsPeriod::Week => {
                today - Days::new(u64::from(today.weekday().num_days_from_sunday()))
            }
            StatsPeriod::Month => today.with_day(1)?,
            StatsPeriod::All => return None,
        };
        Some(local_midnight(&now.timezone(), date))
    }

    pub fn label(self) -> &'static str {
        match self {
            StatsPeriod::Today => "Today",
            StatsPeriod::Week => "This Week",
            StatsPeriod::Month => "This Month",
            StatsPeriod::All => "All Time",
        }
    }
}

/// Midnight of `date` in `tz`. When a DST jump skips midnight, the first
/// valid instant after it is used.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=24)
        .find_map(|h| tz.from_local_datetime(&(midnight + chrono::Duration::hours(h))).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// Completed sessions that started within `period`, in log order.
pub fn filter_sessions<'a, Tz: TimeZone>(
    sessions: &'a [DeepWorkSession],
    period: StatsPeriod,
    now: &DateTime<Tz>,
) -> Vec<&'a DeepWorkSession> {
    let start = period.start(now);
    sessions
        .iter()
        .filter(|s| s.completed)
        .filter(|s| start.as_ref().map_or(true, |start| s.start_time >= *start))
        .collect()
}

/// Like [`filter_sessions`], newest first.
pub fn history<'a, Tz: TimeZone>(
    sessions: &'a [DeepWorkSession],
    period: StatsPeriod,
    now: &DateTime<Tz>,
) -> Vec<&'a DeepWorkSession> {
    let mut list = filter_sessions(sessions, period, now);
    list.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    list
}
