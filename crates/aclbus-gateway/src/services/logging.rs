use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use aclbus_core::protocol::Event;

use crate::realtime::{BroadcastHub, StreamEnd, StreamSink, Subscription};

/// Live event stream: forwards every event, in order, until cancelled or
/// the remote side goes away.
pub struct LogStream {
    sub: Subscription,
}

impl LogStream {
    /// Subscribe now; events published from here on are queued for `run`.
    pub fn subscribe(hub: &BroadcastHub) -> Self {
        Self {
            sub: hub.subscribe(),
        }
    }

    pub fn id(&self) -> u64 {
        self.sub.id()
    }

    pub async fn run<S>(mut self, cancel: CancellationToken, mut sink: S) -> StreamEnd
    where
        S: StreamSink<Arc<Event>>,
    {
        let sub_id = self.sub.id();
        tracing::info!(sub_id, "log stream started");

        let end = loop {
            let ev = tokio::select! {
                biased;
                _ = cancel.cancelled() => break StreamEnd::Cancelled,
                ev = self.sub.recv() => match ev {
                    Some(ev) => ev,
                    None => break StreamEnd::Closed,
                },
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break StreamEnd::Cancelled,
                res = sink.send(ev) => {
                    if res.is_err() {
                        break StreamEnd::Disconnected;
                    }
                }
            }
        };

        // unsubscribe before reporting the end
        drop(self.sub);
        tracing::info!(sub_id, end = end.as_str(), "log stream ended");
        end
    }
}
