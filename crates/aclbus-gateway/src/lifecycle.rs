//! Lifecycle controller: one shared cancellation token for the whole gateway.
//!
//! Stream services watch either the root token or a per-connection child
//! token. Cancelling the root ends every stream and makes the hub drop all
//! further deliveries; cancelling a child ends a single connection.

use tokio_util::sync::CancellationToken;

#[derive(Clone, Default)]
pub struct Lifecycle {
    token: CancellationToken,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared root token.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Token for one connection; cancelled with the root, or on its own.
    pub fn connection(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn shutdown(&self) {
        if !self.token.is_cancelled() {
            tracing::info!("lifecycle shutdown requested");
        }
        self.token.cancel();
    }

    /// Cancel on Ctrl-C. Returns early if shut down some other way.
    pub async fn shutdown_on_ctrl_c(self) {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    tracing::warn!(error = %e, "ctrl_c handler unavailable");
                    return;
                }
                self.shutdown();
            }
            _ = self.token.cancelled() => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_cancel_does_not_reach_root() {
        let lc = Lifecycle::new();
        let conn = lc.connection();
        conn.cancel();
        assert!(!lc.is_shutting_down());

        let other = lc.connection();
        lc.shutdown();
        assert!(other.is_cancelled());
    }
}
