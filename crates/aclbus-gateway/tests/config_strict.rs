#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use aclbus_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
hub:
  queue_capacty: 10 # typo should fail
acl_json: '{}'
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INVALID_ARGUMENT");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
acl_json: '{"X": ["svc.Biz/*"]}'
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.hub.queue_capacity, 256);
    assert_eq!(cfg.gateway.listen, "127.0.0.1:8082");

    let acl = config::load_acl(&cfg).expect("acl must compile");
    assert!(acl.check("X", "svc.Biz/Check").is_ok());
}

#[test]
fn exactly_one_acl_source() {
    let none = "version: 1\n";
    assert!(config::load_from_str(none).is_err());

    let both = r#"
version: 1
acl_path: "acl.json"
acl_json: '{}'
"#;
    assert!(config::load_from_str(both).is_err());
}

#[test]
fn out_of_range_values_fail() {
    let zero_cap = r#"
version: 1
hub: { queue_capacity: 0 }
acl_json: '{}'
"#;
    assert!(config::load_from_str(zero_cap).is_err());

    let bad_listen = r#"
version: 1
gateway: { listen: "not-an-addr" }
acl_json: '{}'
"#;
    assert!(config::load_from_str(bad_listen).is_err());

    let bad_version = "version: 2\nacl_json: '{}'\n";
    assert!(config::load_from_str(bad_version).is_err());
}

#[test]
fn malformed_acl_fails_state_construction() {
    use aclbus_gateway::{app_state::AppState, lifecycle::Lifecycle};

    let cfg = config::load_from_str("version: 1\nacl_json: '{\"X\": \"svc.Biz/*\"}'\n")
        .expect("yaml itself is fine");
    let err = AppState::from_config(cfg, Lifecycle::new())
        .err()
        .expect("acl must be rejected");
    assert_eq!(err.client_code().as_str(), "INVALID_ARGUMENT");
}

#[test]
fn missing_acl_file_is_config_error() {
    let cfg = config::load_from_str("version: 1\nacl_path: \"/nonexistent/acl.json\"\n").unwrap();
    assert!(config::load_acl(&cfg).is_err());
}
