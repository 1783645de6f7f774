use async_trait::async_trait;
use tokio::sync::mpsc;

use aclbus_core::error::{AclBusError, Result};

/// Outcome of one `BroadcastHub::publish`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Subscribers that got the event.
    pub delivered: usize,
    /// Subscribers whose queue was full (event dropped for them).
    pub dropped: usize,
    /// Slots removed because their receiver was gone.
    pub pruned: usize,
}

/// Why a subscription loop stopped. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// Lifecycle token (or the connection's child token) was cancelled.
    Cancelled,
    /// Forwarding to the remote caller failed.
    Disconnected,
    /// The hub closed the subscription queue.
    Closed,
}

impl StreamEnd {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamEnd::Cancelled => "cancelled",
            StreamEnd::Disconnected => "disconnected",
            StreamEnd::Closed => "closed",
        }
    }
}

/// Where a subscription forwards its records (a WebSocket, a test channel).
#[async_trait]
pub trait StreamSink<T>: Send
where
    T: Send + 'static,
{
    async fn send(&mut self, item: T) -> Result<()>;
}

#[async_trait]
impl<T> StreamSink<T> for mpsc::Sender<T>
where
    T: Send + 'static,
{
    async fn send(&mut self, item: T) -> Result<()> {
        mpsc::Sender::send(self, item)
            .await
            .map_err(|_| AclBusError::Internal("stream receiver dropped".into()))
    }
}
