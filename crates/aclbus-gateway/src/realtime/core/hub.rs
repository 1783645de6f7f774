use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};
use tokio_util::sync::CancellationToken;

use aclbus_core::protocol::Event;

use crate::realtime::types::PublishReport;

/// Subscription id. Monotonic, never reused.
pub type SubId = u64;

type Slot = mpsc::Sender<Arc<Event>>;

struct HubInner {
    /// Registry lock: every subscribe/unsubscribe/publish goes through it, so
    /// all subscribers see events in publish order.
    slots: Mutex<BTreeMap<SubId, Slot>>,
    next_id: AtomicU64,
    capacity: usize,
    shutdown: CancellationToken,
    published: AtomicU64,
    dropped: AtomicU64,
}

/// Broadcast hub: fans authorized-call events out to live subscribers.
///
/// Each subscriber owns a bounded queue. `publish` never waits: delivery is a
/// `try_send`, and a full queue drops the event being published for that
/// subscriber only (drop-newest). Queues whose receiver is gone are pruned in
/// the same pass.
#[derive(Clone)]
pub struct BroadcastHub {
    inner: Arc<HubInner>,
}

impl BroadcastHub {
    pub fn new(capacity: usize, shutdown: CancellationToken) -> Self {
        Self {
            inner: Arc::new(HubInner {
                slots: Mutex::new(BTreeMap::new()),
                next_id: AtomicU64::new(1),
                capacity: capacity.max(1),
                shutdown,
                published: AtomicU64::new(0),
                dropped: AtomicU64::new(0),
            }),
        }
    }

    fn slots(&self) -> MutexGuard<'_, BTreeMap<SubId, Slot>> {
        // Nothing in the critical sections can panic mid-update, so a poisoned
        // registry is still consistent.
        self.inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new subscriber. After shutdown the returned queue is
    /// already closed.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.inner.capacity);
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        let mut slots = self.slots();
        if !self.inner.shutdown.is_cancelled() {
            slots.insert(id, tx);
        }
        drop(slots);

        tracing::debug!(sub_id = id, "hub subscribe");
        Subscription {
            id,
            rx,
            hub: self.clone(),
        }
    }

    /// Remove a subscriber and close its queue. Returns false if it was
    /// already gone.
    pub fn unsubscribe(&self, id: SubId) -> bool {
        let removed = self.slots().remove(&id).is_some();
        if removed {
            tracing::debug!(sub_id = id, "hub unsubscribe");
        }
        removed
    }

    /// Deliver `event` to every current subscriber without blocking.
    pub fn publish(&self, event: Event) -> PublishReport {
        let event = Arc::new(event);
        let mut report = PublishReport::default();

        let mut slots = self.slots();
        if self.inner.shutdown.is_cancelled() {
            // closes every remaining queue
            slots.clear();
            return report;
        }

        slots.retain(|id, tx| match tx.try_send(Arc::clone(&event)) {
            Ok(()) => {
                report.delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                report.dropped += 1;
                tracing::debug!(sub_id = id, "subscriber queue full, event dropped");
                true
            }
            Err(TrySendError::Closed(_)) => {
                report.pruned += 1;
                false
            }
        });
        drop(slots);

        self.inner.published.fetch_add(1, Ordering::Relaxed);
        if report.dropped > 0 {
            self.inner
                .dropped
                .fetch_add(report.dropped as u64, Ordering::Relaxed);
        }
        report
    }

    pub fn subscriber_count(&self) -> usize {
        self.slots().len()
    }

    pub fn is_subscribed(&self, id: SubId) -> bool {
        self.slots().contains_key(&id)
    }

    pub fn published_total(&self) -> u64 {
        self.inner.published.load(Ordering::Relaxed)
    }

    /// Events discarded because a subscriber queue was full.
    pub fn dropped_total(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }
}

/// Receiving side of one hub slot. Dropping it unsubscribes.
pub struct Subscription {
    id: SubId,
    rx: mpsc::Receiver<Arc<Event>>,
    hub: BroadcastHub,
}

impl Subscription {
    pub fn id(&self) -> SubId {
        self.id
    }

    /// Wait for the next event. `None` once the slot has been removed and
    /// the queue is drained.
    pub async fn recv(&mut self) -> Option<Arc<Event>> {
        self.rx.recv().await
    }

    /// Take an already-queued event without waiting.
    pub fn try_recv(&mut self) -> Option<Arc<Event>> {
        match self.rx.try_recv() {
            Ok(ev) => Some(ev),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}
