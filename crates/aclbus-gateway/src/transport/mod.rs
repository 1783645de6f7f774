//! Transport layer (HTTP + WebSocket).
//!
//! Adapts axum requests into `CallMeta`, runs the authorizer around every
//! gated route, and pumps stream services into WebSocket text frames.

pub mod http;
pub mod ws;
