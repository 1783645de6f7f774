//! Per-call authorization against the ACL, plus the event it publishes.

use std::future::Future;
use std::sync::Arc;

use aclbus_core::error::{AuthFailure, Result};
use aclbus_core::protocol::{CallMeta, Event};
use aclbus_core::Acl;

use crate::obs::BusMetrics;
use crate::realtime::BroadcastHub;

/// Check run by the transport before every handler.
pub trait CallGuard: Send + Sync {
    fn authorize(&self, meta: &CallMeta, full_method: &str) -> Result<()>;
}

/// Run `handler` only if `guard` admits the call.
///
/// This is the whole interceptor contract: transports (HTTP middleware, a
/// WebSocket upgrade, a test harness) wrap their handler with it and map the
/// error to their own "unauthenticated" status.
pub async fn intercept<G, F, Fut, T>(
    guard: &G,
    meta: &CallMeta,
    full_method: &str,
    handler: F,
) -> Result<T>
where
    G: CallGuard + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    guard.authorize(meta, full_method)?;
    Ok(handler().await)
}

/// ACL-backed authorizer. Publishes one [`Event`] per admitted call.
pub struct Authorizer {
    acl: Arc<Acl>,
    hub: BroadcastHub,
    metrics: Arc<BusMetrics>,
}

impl Authorizer {
    pub fn new(acl: Acl, hub: BroadcastHub, metrics: Arc<BusMetrics>) -> Self {
        Self {
            acl: Arc::new(acl),
            hub,
            metrics,
        }
    }

    /// Validate consumer, method and caller address; on success publish the
    /// call to the hub before returning.
    pub fn req_auth(
        &self,
        meta: &CallMeta,
        full_method: &str,
    ) -> std::result::Result<(), AuthFailure> {
        match self.check(meta, full_method) {
            Ok(ev) => {
                self.metrics.auth_decisions.inc(&[("outcome", "allowed")]);
                tracing::trace!(consumer = %ev.consumer, method = %ev.method, "call authorized");
                self.hub.publish(ev);
                Ok(())
            }
            Err(reason) => {
                self.metrics
                    .auth_decisions
                    .inc(&[("outcome", reason.as_str())]);
                tracing::warn!(
                    consumer = meta.consumer().unwrap_or("-"),
                    method = %full_method,
                    reason = %reason,
                    "call denied"
                );
                Err(reason)
            }
        }
    }

    fn check(
        &self,
        meta: &CallMeta,
        full_method: &str,
    ) -> std::result::Result<Event, AuthFailure> {
        let consumer = meta.consumer().ok_or(AuthFailure::ConsumerNotFound)?;
        self.acl.check(consumer, full_method)?;
        let peer = meta.peer().ok_or(AuthFailure::BadContext)?;
        Ok(Event::now(consumer, full_method, peer.to_string()))
    }
}

impl CallGuard for Authorizer {
    fn authorize(&self, meta: &CallMeta, full_method: &str) -> Result<()> {
        Ok(self.req_auth(meta, full_method)?)
    }
}
