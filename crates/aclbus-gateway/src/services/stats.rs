use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use aclbus_core::error::{AclBusError, Result};
use aclbus_core::protocol::{unix_now, StatSnapshot};

use crate::realtime::{BroadcastHub, StreamEnd, StreamSink, Subscription};

/// Interval statistics stream.
///
/// Counts events per method and per consumer and emits one [`StatSnapshot`]
/// every interval, empty or not. The snapshot is owned by the running task,
/// so counting and read-and-reset never race and nothing here contends with
/// the hub's registry lock.
pub struct StatsAggregator {
    sub: Subscription,
    period: Duration,
    started: Instant,
    window_start: i64,
}

impl StatsAggregator {
    /// Validate the interval and subscribe. Nothing is subscribed on error.
    pub fn subscribe(hub: &BroadcastHub, interval_secs: i64) -> Result<Self> {
        if interval_secs < 1 {
            return Err(AclBusError::Config(format!(
                "interval_seconds must be >= 1, got {interval_secs}"
            )));
        }
        let period = Duration::from_secs(interval_secs as u64);
        let started = Instant::now();
        // the tick schedule must stay representable as an `Instant`
        if period
            .checked_mul(2)
            .and_then(|d| started.checked_add(d))
            .is_none()
        {
            return Err(AclBusError::Config(format!(
                "interval_seconds too large: {interval_secs}"
            )));
        }
        Ok(Self {
            sub: hub.subscribe(),
            period,
            started,
            window_start: unix_now(),
        })
    }

    pub fn id(&self) -> u64 {
        self.sub.id()
    }

    pub async fn run<S>(mut self, cancel: CancellationToken, mut sink: S) -> StreamEnd
    where
        S: StreamSink<StatSnapshot>,
    {
        let sub_id = self.sub.id();
        tracing::info!(sub_id, period_secs = self.period.as_secs(), "stats stream started");

        let mut window = StatSnapshot::starting_at(self.window_start);
        let mut tick = tokio::time::interval_at(self.started + self.period, self.period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let end = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break StreamEnd::Cancelled,
                _ = tick.tick() => {
                    // events already queued belong to the window being closed
                    while let Some(ev) = self.sub.try_recv() {
                        window.record(&ev);
                    }
                    let snap = window.take(unix_now());
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break StreamEnd::Cancelled,
                        res = sink.send(snap) => {
                            if res.is_err() {
                                break StreamEnd::Disconnected;
                            }
                        }
                    }
                }
                ev = self.sub.recv() => match ev {
                    Some(ev) => window.record(&ev),
                    None => break StreamEnd::Closed,
                },
            }
        };

        drop(self.sub);
        tracing::info!(sub_id, end = end.as_str(), "stats stream ended");
        end
    }
}
