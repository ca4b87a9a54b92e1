use jiff::Timestamp;
use parking_lot::RwLock;
use pinhole_telemetry::{LogEvent, LogLevel};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// A received event together with the collector's bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLog {
    pub id: u64,
    pub received_at: Timestamp,
    #[serde(flatten)]
    pub event: LogEvent,
}

/// Exact-match filters for [`LogStore::query`]. `None` matches anything.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub service: Option<String>,
    pub level: Option<String>,
    pub category: Option<String>,
}

impl LogFilter {
    fn matches(&self, log: &StoredLog) -> bool {
        let level = match self.level.as_deref() {
            Some(level) => level.parse::<LogLevel>().ok() == Some(log.event.level),
            None => true,
        };

        level
            && self
                .service
                .as_deref()
                .map_or(true, |service| service == log.event.service)
            && self
                .category
                .as_deref()
                .map_or(true, |category| category == log.event.category)
    }
}

#[derive(Debug, Default)]
struct Inner {
    logs: Vec<StoredLog>,
    last_id: u64,
}

/// In-memory, append-only event store shared across handlers.
///
/// Ids keep increasing across [`LogStore::clear`].
#[derive(Debug, Clone, Default)]
pub struct LogStore {
    inner: Arc<RwLock<Inner>>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, event: LogEvent) -> StoredLog {
        let mut inner = self.inner.write();
        inner.last_id += 1;
        let stored = StoredLog {
            id: inner.last_id,
            received_at: Timestamp::now(),
            event,
        };
        inner.logs.push(stored.clone());
        stored
    }

    /// Returns the number of matching events and the most recent `limit` of them.
    ///
    /// A `limit` of zero returns every match.
    pub fn query(&self, filter: &LogFilter, limit: usize) -> (usize, Vec<StoredLog>) {
        let inner = self.inner.read();
        let matched: Vec<&StoredLog> = inner.logs.iter().filter(|log| filter.matches(log)).collect();
        let total = matched.len();
        let skip = match limit {
            0 => 0,
            limit => total.saturating_sub(limit),
        };

        (total, matched[skip..].iter().map(|log| (*log).clone()).collect())
    }

    pub fn len(&self) -> usize {
        self.inner.read().logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every stored event and returns how many there were.
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.write();
        let cleared = inner.logs.len();
        inner.logs.clear();
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(service: &str, level: LogLevel, category: &str, message: &str) -> LogEvent {
        LogEvent::new(service, level, category, message)
    }

    fn seeded() -> LogStore {
        let store = LogStore::new();
        store.append(event("backend", LogLevel::Info, "request", "GET / - Started"));
        store.append(event("backend", LogLevel::Warn, "validation", "bad url"));
        store.append(event("frontend", LogLevel::Info, "page", "loaded"));
        store.append(event("backend", LogLevel::Info, "response", "GET / - 200 - 1ms"));
        store
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let store = LogStore::new();
        let first = store.append(event("backend", LogLevel::Info, "request", "a"));
        let second = store.append(event("backend", LogLevel::Info, "request", "b"));

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(second.received_at >= first.received_at);
    }

    #[test]
    fn ids_survive_clear() {
        let store = seeded();
        assert_eq!(store.clear(), 4);
        assert!(store.is_empty());

        let next = store.append(event("backend", LogLevel::Info, "request", "again"));
        assert_eq!(next.id, 5);
    }

    #[test]
    fn query_filters_by_exact_match() {
        let store = seeded();

        let filter = LogFilter {
            service: Some("backend".to_string()),
            level: Some("info".to_string()),
            ..Default::default()
        };
        let (total, logs) = store.query(&filter, DEFAULT_QUERY_LIMIT);
        assert_eq!(total, 2);
        assert_eq!(logs[0].event.category, "request");
        assert_eq!(logs[1].event.category, "response");

        let filter = LogFilter {
            category: Some("valid".to_string()),
            ..Default::default()
        };
        assert_eq!(store.query(&filter, DEFAULT_QUERY_LIMIT).0, 0);
    }

    #[test]
    fn unknown_level_matches_nothing() {
        let store = seeded();
        let filter = LogFilter {
            level: Some("debug".to_string()),
            ..Default::default()
        };

        assert_eq!(store.query(&filter, DEFAULT_QUERY_LIMIT), (0, vec![]));
    }

    #[test]
    fn limit_keeps_most_recent() {
        let store = seeded();

        let (total, logs) = store.query(&LogFilter::default(), 2);
        assert_eq!(total, 4);
        let ids: Vec<u64> = logs.iter().map(|log| log.id).collect();
        assert_eq!(ids, vec![3, 4]);

        let (_, logs) = store.query(&LogFilter::default(), 0);
        assert_eq!(logs.len(), 4);
    }

    #[test]
    fn stored_log_flattens_event() {
        let store = LogStore::new();
        let stored = store.append(event("backend", LogLevel::Error, "storage", "boom"));

        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["id"], 1);
        assert!(json["receivedAt"].is_string());
        assert_eq!(json["service"], "backend");
        assert_eq!(json["level"], "error");
        assert_eq!(json["message"], "boom");
    }
}
