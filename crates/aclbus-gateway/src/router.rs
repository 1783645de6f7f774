//! Axum router wiring.
//!
//! Business and admin routes sit behind the authorization layer; ops routes
//! do not.

use std::net::SocketAddr;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

use crate::{app_state::AppState, ops, services::biz, transport};

pub const BIZ_CHECK: &str = "/svc.Biz/Check";
pub const BIZ_ADD: &str = "/svc.Biz/Add";
pub const BIZ_TEST: &str = "/svc.Biz/Test";
pub const ADMIN_LOGGING: &str = "/svc.Admin/Logging";
pub const ADMIN_STATISTICS: &str = "/svc.Admin/Statistics";

pub fn build_router(state: AppState) -> Router {
    let gated = Router::new()
        .route(BIZ_CHECK, post(biz::check))
        .route(BIZ_ADD, post(biz::add))
        .route(BIZ_TEST, post(biz::test))
        .route(ADMIN_LOGGING, get(transport::ws::logging))
        .route(ADMIN_STATISTICS, get(transport::ws::statistics))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            transport::http::authorize,
        ));

    ops::routes().merge(gated)
        .with_state(state)
}

/// Serve until the lifecycle token is cancelled.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let shutdown = state.lifecycle().token();
    let app = build_router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.cancelled_owned())
    .await
}
