//! aclBus core: ACL store, call/event records, and the shared error surface.
//!
//! This crate carries no transport or runtime dependencies so the gateway,
//! tests and tooling can share the same ACL semantics.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `AclBusError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod acl;
pub mod error;
pub mod protocol;

pub use acl::{Acl, MethodRule};
/// Shared result type.
pub use error::{AclBusError, AuthFailure, Result};
