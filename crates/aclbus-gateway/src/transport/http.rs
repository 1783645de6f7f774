//! HTTP side of the transport: authorization middleware and error mapping.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use aclbus_core::error::{AclBusError, ClientCode};
use aclbus_core::protocol::CallMeta;

use crate::app_state::AppState;
use crate::policy;

/// Error wrapper that renders as `{"code": ..., "msg": ...}`.
#[derive(Debug)]
pub struct ApiError(pub AclBusError);

impl From<AclBusError> for ApiError {
    fn from(e: AclBusError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status = match code {
            ClientCode::Unauthenticated => StatusCode::UNAUTHORIZED,
            ClientCode::InvalidArgument => StatusCode::BAD_REQUEST,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let msg = match &self.0 {
            AclBusError::Unauthenticated(reason) => reason.to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "code": code.as_str(), "msg": msg }))).into_response()
    }
}

/// Full method name for a request path: `/svc.Biz/Check` -> `svc.Biz/Check`.
pub fn full_method(path: &str) -> &str {
    path.trim_start_matches('/')
}

/// Build call metadata from request headers and the peer address.
pub fn call_meta(headers: &HeaderMap, peer: Option<SocketAddr>) -> CallMeta {
    let mut meta = CallMeta::new(peer);
    for (name, value) in headers {
        if let Ok(v) = value.to_str() {
            meta.insert(name.as_str(), v);
        }
    }
    meta
}

/// Route layer: authorize, then run the handler.
pub async fn authorize(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0);
    let meta = call_meta(req.headers(), peer);
    let method = full_method(req.uri().path()).to_string();

    match policy::intercept(app.authorizer(), &meta, &method, || next.run(req)).await {
        Ok(resp) => resp,
        Err(e) => ApiError(e).into_response(),
    }
}
