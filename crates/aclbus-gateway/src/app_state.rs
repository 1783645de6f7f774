//! Shared application state for the aclBus gateway.
//!
//! Built once at startup; a malformed ACL fails construction.

use std::sync::Arc;

use aclbus_core::error::Result;
use aclbus_core::Acl;

use crate::config::{self, GatewayConfig};
use crate::lifecycle::Lifecycle;
use crate::obs::BusMetrics;
use crate::policy::Authorizer;
use crate::realtime::BroadcastHub;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    authorizer: Authorizer,
    hub: BroadcastHub,
    lifecycle: Lifecycle,
    metrics: Arc<BusMetrics>,
}

impl AppState {
    /// Load the configured ACL and build the state.
    pub fn from_config(cfg: GatewayConfig, lifecycle: Lifecycle) -> Result<Self> {
        let acl = config::load_acl(&cfg)?;
        tracing::info!(consumers = acl.len(), "acl loaded");
        Ok(Self::new(cfg, acl, lifecycle))
    }

    pub fn new(cfg: GatewayConfig, acl: Acl, lifecycle: Lifecycle) -> Self {
        let metrics = Arc::new(BusMetrics::default());
        let hub = BroadcastHub::new(cfg.hub.queue_capacity, lifecycle.token());
        let authorizer = Authorizer::new(acl, hub.clone(), Arc::clone(&metrics));

        Self {
            inner: Arc::new(AppStateInner {
                authorizer,
                hub,
                lifecycle,
                metrics,
            }),
        }
    }

    pub fn authorizer(&self) -> &Authorizer {
        &self.inner.authorizer
    }

    pub fn hub(&self) -> &BroadcastHub {
        &self.inner.hub
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.inner.lifecycle
    }

    pub fn metrics(&self) -> Arc<BusMetrics> {
        Arc::clone(&self.inner.metrics)
    }

    /// Hub counters appended to `/metrics`.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        let hub = self.hub();
        vec![
            ("aclbus_events_published_total", hub.published_total()),
            ("aclbus_deliveries_dropped_total", hub.dropped_total()),
            ("aclbus_hub_subscribers", hub.subscriber_count() as u64),
        ]
    }
}
