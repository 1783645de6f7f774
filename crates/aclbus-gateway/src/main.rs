//! aclBus gateway binary.
//!
//! Usage: `aclbus-gateway [config.yaml]` (default `aclbus.yaml`).

use tracing_subscriber::{fmt, EnvFilter};

use aclbus_core::error::{AclBusError, Result};
use aclbus_gateway::{app_state::AppState, config, lifecycle::Lifecycle, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "aclbus-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "aclbus.yaml".into());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.gateway.listen_addr()?;

    let lifecycle = Lifecycle::new();
    let state = AppState::from_config(cfg, lifecycle.clone())?;

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| AclBusError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, "aclbus-gateway starting");

    tokio::spawn(lifecycle.clone().shutdown_on_ctrl_c());

    router::serve(listener, state)
        .await
        .map_err(|e| AclBusError::Internal(format!("server failed: {e}")))?;

    tracing::info!("aclbus-gateway stopped");
    Ok(())
}
