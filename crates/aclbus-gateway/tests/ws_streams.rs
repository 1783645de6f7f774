#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::StreamExt;
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use aclbus_core::Acl;
use aclbus_gateway::{app_state::AppState, config, lifecycle::Lifecycle, router};

const ACL: &str = r#"{"X": ["svc.Biz/*"], "admin": ["svc.Admin/*"]}"#;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start() -> (SocketAddr, AppState, Lifecycle) {
    let cfg = config::load_from_str("version: 1\nacl_json: '{}'\n").unwrap();
    let lifecycle = Lifecycle::new();
    let state = AppState::new(cfg, Acl::from_json(ACL).unwrap(), lifecycle.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(router::serve(listener, state.clone()));
    (addr, state, lifecycle)
}

async fn open(addr: SocketAddr, path_and_query: &str, consumer: &'static str) -> Client {
    let mut req = format!("ws://{addr}{path_and_query}")
        .into_client_request()
        .unwrap();
    req.headers_mut()
        .insert("consumer", HeaderValue::from_static(consumer));
    let (ws, _resp) = connect_async(req).await.expect("upgrade");
    ws
}

async fn next_json(ws: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("frame in time")
            .expect("stream open")
            .unwrap();
        if let Message::Text(_) = msg {
            return serde_json::from_str(msg.to_text().unwrap()).unwrap();
        }
    }
}

async fn biz_call(addr: SocketAddr, method: &str) {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/{method}"))
        .header("consumer", "X")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

/// Poll until `cond` holds; the server finishes stream bookkeeping
/// asynchronously after the client goes away.
async fn eventually(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached");
}

#[tokio::test]
async fn log_and_stats_frames_then_client_close_frees_slots() {
    let (addr, state, _lifecycle) = start().await;

    let mut log = open(addr, "/svc.Admin/Logging", "admin").await;
    let mut stats = open(addr, "/svc.Admin/Statistics?interval_seconds=1", "admin").await;
    assert_eq!(state.hub().subscriber_count(), 2);

    biz_call(addr, "svc.Biz/Check").await;

    // opening the statistics stream is itself an authorized call
    let first = next_json(&mut log).await;
    assert_eq!(first["consumer"], "admin");
    assert_eq!(first["method"], "svc.Admin/Statistics");

    let ev = next_json(&mut log).await;
    assert_eq!(ev["consumer"], "X");
    assert_eq!(ev["method"], "svc.Biz/Check");
    assert!(ev["host"].as_str().unwrap().starts_with("127.0.0.1:"));
    assert!(ev["timestamp"].as_i64().unwrap() > 0);

    let snap = next_json(&mut stats).await;
    assert_eq!(snap["by_method"]["svc.Biz/Check"], 1);
    assert_eq!(snap["by_consumer"]["X"], 1);

    log.close(None).await.unwrap();
    stats.close(None).await.unwrap();

    let metrics = state.metrics();
    eventually(|| {
        metrics
            .streams_ended
            .get(&[("kind", "logging"), ("end", "disconnected")])
            == 1
            && metrics
                .streams_ended
                .get(&[("kind", "statistics"), ("end", "disconnected")])
                == 1
    })
    .await;
    assert_eq!(state.hub().subscriber_count(), 0);
    assert_eq!(metrics.streams_active.get(&[("kind", "logging")]), 0);
    assert_eq!(metrics.streams_active.get(&[("kind", "statistics")]), 0);
}

#[tokio::test]
async fn one_client_leaving_does_not_end_the_other() {
    let (addr, state, _lifecycle) = start().await;

    let mut a = open(addr, "/svc.Admin/Logging", "admin").await;
    let mut b = open(addr, "/svc.Admin/Logging", "admin").await;
    // b's own open call
    assert_eq!(next_json(&mut a).await["method"], "svc.Admin/Logging");

    a.close(None).await.unwrap();
    eventually(|| state.hub().subscriber_count() == 1).await;

    biz_call(addr, "svc.Biz/Add").await;
    assert_eq!(next_json(&mut b).await["method"], "svc.Biz/Add");
}

#[tokio::test]
async fn server_shutdown_ends_open_streams() {
    let (addr, state, lifecycle) = start().await;
    let mut log = open(addr, "/svc.Admin/Logging", "admin").await;

    lifecycle.shutdown();

    let end = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match log.next().await {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
    })
    .await;
    assert!(end.is_ok(), "stream must end on shutdown");

    let metrics = state.metrics();
    eventually(|| {
        metrics
            .streams_ended
            .get(&[("kind", "logging"), ("end", "cancelled")])
            == 1
    })
    .await;
    assert_eq!(state.hub().subscriber_count(), 0);
}
