//! Policy layer: ACL authorization and the call interceptor.
//!
//! The ACL itself is compiled in `aclbus-core`; this module binds it to the
//! hub so every admitted call becomes an event.

pub mod authorizer;

pub use authorizer::{intercept, Authorizer, CallGuard};
