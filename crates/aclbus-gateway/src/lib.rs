//! aclBus gateway library entry.
//!
//! Wires the ACL authorizer, broadcast hub, stream services and the axum
//! transport into one service. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod lifecycle;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod realtime;
pub mod router;
pub mod services;
pub mod transport;
