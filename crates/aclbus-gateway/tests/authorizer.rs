#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use aclbus_core::error::{AclBusError, AuthFailure};
use aclbus_core::protocol::CallMeta;
use aclbus_core::Acl;
use aclbus_gateway::obs::BusMetrics;
use aclbus_gateway::policy::{intercept, Authorizer};
use aclbus_gateway::realtime::BroadcastHub;

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

fn setup(acl: &str) -> (Authorizer, BroadcastHub, Arc<BusMetrics>) {
    let hub = BroadcastHub::new(16, CancellationToken::new());
    let metrics = Arc::new(BusMetrics::default());
    let auth = Authorizer::new(Acl::from_json(acl).unwrap(), hub.clone(), Arc::clone(&metrics));
    (auth, hub, metrics)
}

fn as_consumer(c: &str) -> CallMeta {
    CallMeta::new(Some(peer())).with("consumer", c)
}

#[tokio::test]
async fn wildcard_service_allows_biz_denies_admin() {
    let (auth, hub, _) = setup(r#"{"X": ["svc.Biz/*"]}"#);
    let mut sub = hub.subscribe();

    assert_eq!(auth.req_auth(&as_consumer("X"), "svc.Biz/Check"), Ok(()));
    assert_eq!(
        auth.req_auth(&as_consumer("X"), "svc.Admin/Logging"),
        Err(AuthFailure::MethodNotAllowed)
    );

    let ev = sub.recv().await.unwrap();
    assert_eq!(ev.consumer, "X");
    assert_eq!(ev.method, "svc.Biz/Check");
    assert_eq!(ev.host, "127.0.0.1:40000");
    assert!(ev.timestamp > 0);
    // the denied call published nothing
    assert!(sub.try_recv().is_none());
}

#[test]
fn unknown_consumers_are_rejected() {
    let (auth, hub, metrics) = setup(r#"{"X": ["*"]}"#);
    for c in ["Y", "x", "X ", "admin"] {
        assert_eq!(
            auth.req_auth(&as_consumer(c), "svc.Biz/Check"),
            Err(AuthFailure::UnknownConsumer)
        );
    }
    assert_eq!(hub.published_total(), 0);
    assert_eq!(metrics.auth_decisions.get(&[("outcome", "unknown_consumer")]), 4);
}

#[test]
fn missing_consumer_and_missing_peer() {
    let (auth, _, _) = setup(r#"{"X": ["*"]}"#);

    let no_consumer = CallMeta::new(Some(peer()));
    assert_eq!(
        auth.req_auth(&no_consumer, "svc.Biz/Check"),
        Err(AuthFailure::ConsumerNotFound)
    );

    let empty_consumer = CallMeta::new(Some(peer())).with("consumer", "");
    assert_eq!(
        auth.req_auth(&empty_consumer, "svc.Biz/Check"),
        Err(AuthFailure::ConsumerNotFound)
    );

    let no_peer = CallMeta::new(None).with("consumer", "X");
    assert_eq!(auth.req_auth(&no_peer, "svc.Biz/Check"), Err(AuthFailure::BadContext));
}

#[test]
fn first_consumer_value_wins() {
    let (auth, _, _) = setup(r#"{"X": ["*"]}"#);
    let meta = CallMeta::new(Some(peer()))
        .with("Consumer", "X")
        .with("consumer", "Y");
    assert_eq!(auth.req_auth(&meta, "svc.Biz/Add"), Ok(()));
}

#[tokio::test]
async fn intercept_skips_handler_on_denial() {
    let (auth, _, _) = setup(r#"{"X": ["svc.Biz/Check"]}"#);
    let ran = AtomicBool::new(false);
    let flag = &ran;

    let err = intercept(&auth, &as_consumer("X"), "svc.Biz/Add", move || async move {
        flag.store(true, Ordering::SeqCst);
    })
    .await
    .unwrap_err();
    assert!(matches!(err, AclBusError::Unauthenticated(AuthFailure::MethodNotAllowed)));
    assert_eq!(err.client_code().as_str(), "UNAUTHENTICATED");
    assert!(!ran.load(Ordering::SeqCst));

    let out = intercept(&auth, &as_consumer("X"), "svc.Biz/Check", || async { 42 })
        .await
        .unwrap();
    assert_eq!(out, 42);
}

#[tokio::test]
async fn event_is_published_before_handler_runs() {
    let (auth, hub, _) = setup(r#"{"X": ["*"]}"#);
    let mut sub = hub.subscribe();
    let sub_ref = &mut sub;

    let seen_in_handler = intercept(&auth, &as_consumer("X"), "svc.Biz/Test", move || async move {
        sub_ref.try_recv().map(|ev| ev.method.clone())
    })
    .await
    .unwrap();
    assert_eq!(seen_in_handler.as_deref(), Some("svc.Biz/Test"));
}
