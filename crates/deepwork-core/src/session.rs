//! Completed deep-work sessions and the append-only log that persists them.
//!
//! The log is a JSON array stored under [`SESSIONS_KEY`]. Appends read the
//! current array, push, and write the whole array back. A failed write parks
//! the record in a pending queue that is retried on the next append.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::StoreError;
use crate::storage::{KeyValueStore, SESSIONS_KEY};

/// One finished work interval. Never mutated once logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepWorkSession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Wall-clock milliseconds between `start_time` and `end_time`.
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub completed: bool,
}

impl DeepWorkSession {
    /// Record for a work interval that ran from `start` to `end`.
    pub fn new_completed(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let duration = (end - start).num_milliseconds().max(0) as u64;
        Self {
            id: Uuid::new_v4().to_string(),
            start_time: start,
            end_time: end,
            duration,
            notes: None,
            tags: None,
            completed: true,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// Append-only view of the persisted session list.
pub struct SessionLog {
    store: Arc<dyn KeyValueStore>,
    pending: Vec<DeepWorkSession>,
}

impl SessionLog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            pending: Vec::new(),
        }
    }

    /// Append `session`, flushing any previously failed appends first.
    ///
    /// # Errors
    /// On failure the session stays queued in memory and is retried later.
    pub fn append(&mut self, session: DeepWorkSession) -> Result<(), StoreError> {
        self.pending.push(session);
        self.flush_pending()
    }

    /// Retry writing every queued session.
    ///
    /// # Errors
    /// Returns the store error; the queue is left intact.
    pub fn flush_pending(&mut self) -> Result<(), StoreError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        // Existing entries are written back untouched, unparseable ones included.
        let mut items = match self.store.get(SESSIONS_KEY)? {
            Some(Value::Array(items)) => items,
            Some(_) => {
                warn!("session log is not a list; starting a new one");
                Vec::new()
            }
            None => Vec::new(),
        };
        for session in &self.pending {
            let value = serde_json::to_value(session).map_err(|source| StoreError::InvalidJson {
                key: SESSIONS_KEY.into(),
                source,
            })?;
            items.push(value);
        }
        let total = items.len();
        self.store.set(SESSIONS_KEY, &Value::Array(items))?;
        debug!(written = self.pending.len(), total, "session log flushed");
        self.pending.clear();
        Ok(())
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Every known session in insertion order, queued ones last.
    pub fn all(&self) -> Vec<DeepWorkSession> {
        let mut list = self.read_persisted().unwrap_or_else(|e| {
            warn!(error = %e, "failed to read session log");
            Vec::new()
        });
        list.extend(self.pending.iter().cloned());
        list
    }

    /// Persisted sessions only. An absent or non-array value reads as empty;
    /// individual malformed entries are skipped.
    fn read_persisted(&self) -> Result<Vec<DeepWorkSession>, StoreError> {
        let raw = match self.store.get(SESSIONS_KEY)? {
            Some(Value::Array(items)) => items,
            Some(_) => {
                warn!("session log is not a list; treating as empty");
                return Ok(Vec::new());
            }
            None => return Ok(Vec::new()),
        };
        Ok(raw
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!(error = %e, "skipping malformed session record");
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn at(min: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(min)
    }

    #[test]
    fn new_completed_uses_wall_clock_duration() {
        let s = DeepWorkSession::new_completed(at(0), at(25) + Duration::milliseconds(340));
        assert_eq!(s.duration, 25 * 60 * 1000 + 340);
        assert!(s.completed);
        assert!(s.notes.is_none());
    }

    #[test]
    fn ids_are_unique() {
        let a = DeepWorkSession::new_completed(at(0), at(1));
        let b = DeepWorkSession::new_completed(at(0), at(1));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let s = DeepWorkSession::new_completed(at(0), at(1)).with_tags(["deep"]);
        let v = serde_json::to_value(&s).unwrap();
        assert!(v.get("startTime").is_some());
        assert!(v.get("endTime").is_some());
        assert_eq!(v["tags"], json!(["deep"]));
        assert!(v.get("notes").is_none());
    }

    #[test]
    fn reads_records_written_by_browser_clients() {
        let v = json!({
            "id": "abc",
            "startTime": "2024-03-01T09:00:00.000Z",
            "endTime": "2024-03-01T09:25:00.000Z",
            "duration": 1500000,
            "completed": true
        });
        let s: DeepWorkSession = serde_json::from_value(v).unwrap();
        assert_eq!(s.start_time, at(0));
        assert_eq!(s.duration, 1_500_000);
    }

    #[test]
    fn append_preserves_order() {
        let store = Arc::new(MemoryStore::new());
        let mut log = SessionLog::new(store.clone());
        let first = DeepWorkSession::new_completed(at(0), at(25));
        let second = DeepWorkSession::new_completed(at(30), at(55));
        log.append(first.clone()).unwrap();
        log.append(second.clone()).unwrap();
        assert_eq!(log.all(), vec![first, second]);

        // A fresh log over the same store sees the persisted list.
        assert_eq!(SessionLog::new(store).all().len(), 2);
    }

    #[test]
    fn failed_append_is_queued_and_retried() {
        let store = Arc::new(MemoryStore::new());
        let mut log = SessionLog::new(store.clone());
        store.fail_writes(true);
        let first = DeepWorkSession::new_completed(at(0), at(25));
        assert!(log.append(first.clone()).is_err());
        assert_eq!(log.pending_count(), 1);
        assert_eq!(log.all(), vec![first.clone()]);

        store.fail_writes(false);
        let second = DeepWorkSession::new_completed(at(30), at(55));
        log.append(second.clone()).unwrap();
        assert_eq!(log.pending_count(), 0);
        assert_eq!(SessionLog::new(store).all(), vec![first, second]);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        let good = DeepWorkSession::new_completed(at(0), at(25));
        store
            .set(
                SESSIONS_KEY,
                &json!([serde_json::to_value(&good).unwrap(), {"id": 7}]),
            )
            .unwrap();
        assert_eq!(SessionLog::new(store).all(), vec![good]);
    }

    #[test]
    fn append_leaves_existing_entries_untouched() {
        let store = Arc::new(MemoryStore::new());
        let mut extended =
            serde_json::to_value(DeepWorkSession::new_completed(at(0), at(25))).unwrap();
        extended["rating"] = json!(5);
        let unparseable = json!({
            "id": "b",
            "startTime": "2024-03-01T10:00:00.000Z",
            "endTime": "2024-03-01T10:25:00.000Z",
            "duration": 1500000.0,
            "completed": true
        });
        store
            .set(SESSIONS_KEY, &json!([extended.clone(), unparseable.clone()]))
            .unwrap();

        let mut log = SessionLog::new(store.clone());
        log.append(DeepWorkSession::new_completed(at(30), at(55)))
            .unwrap();

        let raw = store.get(SESSIONS_KEY).unwrap().unwrap();
        let items = raw.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], extended);
        assert_eq!(items[0]["rating"], json!(5));
        assert_eq!(items[1], unparseable);
        assert_eq!(log.all().len(), 2);
    }

    #[test]
    fn non_list_value_reads_as_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(SESSIONS_KEY, &json!({"oops": true})).unwrap();
        assert!(SessionLog::new(store).all().is_empty());
    }
}
