use axum::Json;
use serde::{Deserialize, Serialize};

/// Empty request/response message.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Nothing {}

pub async fn check() -> Json<Nothing> {
    Json(Nothing {})
}

pub async fn add() -> Json<Nothing> {
    Json(Nothing {})
}

pub async fn test() -> Json<Nothing> {
    Json(Nothing {})
}
