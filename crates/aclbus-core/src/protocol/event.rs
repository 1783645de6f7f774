use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Current wall-clock time as unix seconds.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Record of one authorized call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unix seconds at authorization time.
    pub timestamp: i64,
    pub consumer: String,
    /// Full method name, e.g. `svc.Biz/Check`.
    pub method: String,
    /// Caller socket address (`ip:port`).
    pub host: String,
}

impl Event {
    pub fn now(
        consumer: impl Into<String>,
        method: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: unix_now(),
            consumer: consumer.into(),
            method: method.into(),
            host: host.into(),
        }
    }
}

/// Counters for one statistics window.
///
/// `timestamp` is the window start. Maps are ordered so serialized snapshots
/// are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub timestamp: i64,
    pub by_method: BTreeMap<String, u64>,
    pub by_consumer: BTreeMap<String, u64>,
}

impl StatSnapshot {
    pub fn starting_at(timestamp: i64) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    pub fn record(&mut self, ev: &Event) {
        *self.by_method.entry(ev.method.clone()).or_insert(0) += 1;
        *self.by_consumer.entry(ev.consumer.clone()).or_insert(0) += 1;
    }

    /// Hand out the finished window and start a new one at `next_start`.
    pub fn take(&mut self, next_start: i64) -> StatSnapshot {
        std::mem::replace(self, StatSnapshot::starting_at(next_start))
    }

    pub fn is_empty(&self) -> bool {
        self.by_method.is_empty()
    }
}
