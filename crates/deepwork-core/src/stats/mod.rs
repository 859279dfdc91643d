//! Statistics module for Deepwork
//!
//! Read-only views over the session log: period filters (today, this week,
//! this month, all time), newest-first history, and count/duration summaries.
//! Nothing here touches the engine or the store.

mod period;
mod summary;

pub use period::{filter_sessions, history, StatsPeriod};
pub use summary::{summarize, PeriodSummary, StatsReport};
