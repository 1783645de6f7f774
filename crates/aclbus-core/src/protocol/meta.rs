use std::collections::HashMap;
use std::net::SocketAddr;

/// Metadata key carrying the caller's consumer id.
pub const CONSUMER_KEY: &str = "consumer";

/// Transport-agnostic view of an inbound call.
///
/// Keys are lower-cased; a key may carry several values, the first one wins
/// for identity lookups.
#[derive(Debug, Clone, Default)]
pub struct CallMeta {
    values: HashMap<String, Vec<String>>,
    peer: Option<SocketAddr>,
}

impl CallMeta {
    pub fn new(peer: Option<SocketAddr>) -> Self {
        Self {
            values: HashMap::new(),
            peer,
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values
            .entry(key.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn consumer(&self) -> Option<&str> {
        self.get(CONSUMER_KEY).filter(|c| !c.is_empty())
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }
}
