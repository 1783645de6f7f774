//! WebSocket stream endpoints.
//!
//! - `GET /svc.Admin/Logging`: every event as a JSON text frame.
//! - `GET /svc.Admin/Statistics?interval_seconds=N`: one snapshot per interval.
//!
//! The subscription is taken before the upgrade completes, so nothing
//! published after the (authorized) request is missed. Each connection runs
//! under a child of the lifecycle token; a client close cancels only that
//! child.

use std::future::Future;

use async_trait::async_trait;
use axum::{
    extract::{
        rejection::QueryRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use aclbus_core::error::{AclBusError, Result};

use crate::app_state::AppState;
use crate::realtime::{StreamEnd, StreamSink};
use crate::services::{LogStream, StatsAggregator};
use crate::transport::http::ApiError;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub interval_seconds: i64,
}

/// Sink writing JSON text frames to the socket's write half.
pub struct WsSink {
    tx: SplitSink<WebSocket, Message>,
}

#[async_trait]
impl<T> StreamSink<T> for WsSink
where
    T: Serialize + Send + 'static,
{
    async fn send(&mut self, item: T) -> Result<()> {
        let s = serde_json::to_string(&item)
            .map_err(|e| AclBusError::Internal(format!("json encode failed: {e}")))?;
        self.tx
            .send(Message::Text(s))
            .await
            .map_err(|_| AclBusError::Internal("websocket closed".into()))
    }
}

pub async fn logging(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let stream = LogStream::subscribe(app.hub());
    ws.on_upgrade(move |socket| async move {
        pump(app, "logging", socket, |cancel, sink| stream.run(cancel, sink)).await;
    })
}

pub async fn statistics(
    State(app): State<AppState>,
    query: std::result::Result<Query<StatsQuery>, QueryRejection>,
    ws: WebSocketUpgrade,
) -> std::result::Result<Response, ApiError> {
    let Query(q) = query.map_err(|e| {
        AclBusError::Config(format!("interval_seconds: {}", e.body_text()))
    })?;
    let stream = StatsAggregator::subscribe(app.hub(), q.interval_seconds)?;
    Ok(ws.on_upgrade(move |socket| async move {
        pump(app, "statistics", socket, |cancel, sink| stream.run(cancel, sink)).await;
    }))
}

/// Drive one stream service over a socket until it ends.
async fn pump<F, Fut>(app: AppState, kind: &'static str, socket: WebSocket, run: F) -> StreamEnd
where
    F: FnOnce(CancellationToken, WsSink) -> Fut,
    Fut: Future<Output = StreamEnd>,
{
    let conn = app.lifecycle().connection();
    let (tx, mut rx) = socket.split();

    // Reader: the client only ever closes; anything else is ignored.
    let watch = conn.clone();
    let reader = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = watch.cancelled() => break,
                msg = rx.next() => match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                },
            }
        }
        watch.cancel();
    });

    let metrics = app.metrics();
    metrics.streams_active.inc(&[("kind", kind)]);

    let end = match run(conn.clone(), WsSink { tx }).await {
        StreamEnd::Cancelled if !app.lifecycle().is_shutting_down() => StreamEnd::Disconnected,
        end => end,
    };

    conn.cancel();
    let _ = reader.await;

    metrics.streams_active.dec(&[("kind", kind)]);
    metrics
        .streams_ended
        .inc(&[("kind", kind), ("end", end.as_str())]);
    end
}
