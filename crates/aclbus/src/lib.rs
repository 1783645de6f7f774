//! Top-level facade crate for aclBus.
//!
//! Re-exports the core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use aclbus_core::*;
}

pub mod gateway {
    pub use aclbus_gateway::*;
}
