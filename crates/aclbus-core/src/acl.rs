//! ACL store: consumer id -> ordered list of allowed method patterns.
//!
//! Load format is a JSON object, e.g. `{"X": ["svc.Biz/Check", "svc.Admin/*"]}`.
//! A pattern is either an exact full method name or a prefix terminated by
//! [`WILDCARD`]. The store is compiled once and never mutated afterwards, so it
//! can be shared behind an `Arc` without a lock.

use std::collections::HashMap;

use crate::error::{AclBusError, AuthFailure, Result};

/// Trailing marker turning a pattern into a prefix match.
pub const WILDCARD: char = '*';

/// Compiled method pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodRule {
    Exact(String),
    Prefix(String),
}

impl MethodRule {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(AclBusError::Config("empty method pattern".into()));
        }
        // only a trailing marker is special; `a*b` stays a literal name
        match raw.strip_suffix(WILDCARD) {
            Some(prefix) => Ok(MethodRule::Prefix(prefix.to_string())),
            None => Ok(MethodRule::Exact(raw.to_string())),
        }
    }

    pub fn matches(&self, method: &str) -> bool {
        match self {
            MethodRule::Exact(m) => m == method,
            MethodRule::Prefix(p) => method.starts_with(p.as_str()),
        }
    }
}

/// Immutable access-control list.
#[derive(Debug, Clone, Default)]
pub struct Acl {
    consumers: HashMap<String, Vec<MethodRule>>,
}

impl Acl {
    /// Parse and compile an ACL blob. Any malformed input is a config error.
    pub fn from_json(s: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(s)
            .map_err(|e| AclBusError::Config(format!("invalid acl json: {e}")))?;

        let mut consumers = HashMap::with_capacity(raw.len());
        for (consumer, patterns) in raw {
            let rules = patterns
                .iter()
                .map(|p| MethodRule::parse(p))
                .collect::<Result<Vec<_>>>()
                .map_err(|e| AclBusError::Config(format!("acl entry {consumer:?}: {e}")))?;
            consumers.insert(consumer, rules);
        }

        tracing::debug!(consumers = consumers.len(), "acl compiled");
        Ok(Self { consumers })
    }

    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    pub fn rules(&self, consumer: &str) -> Option<&[MethodRule]> {
        self.consumers.get(consumer).map(Vec::as_slice)
    }

    /// Check `consumer` may call `method`.
    pub fn check(&self, consumer: &str, method: &str) -> std::result::Result<(), AuthFailure> {
        let rules = self.rules(consumer).ok_or(AuthFailure::UnknownConsumer)?;
        if rules.iter().any(|r| r.matches(method)) {
            Ok(())
        } else {
            Err(AuthFailure::MethodNotAllowed)
        }
    }
}
