use std::net::SocketAddr;

use serde::Deserialize;
use aclbus_core::error::{AclBusError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub hub: HubSection,

    /// Path to the ACL JSON file.
    #[serde(default)]
    pub acl_path: Option<String>,

    /// Inline ACL JSON.
    #[serde(default)]
    pub acl_json: Option<String>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(AclBusError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        match (&self.acl_path, &self.acl_json) {
            (Some(_), None) | (None, Some(_)) => {}
            _ => {
                return Err(AclBusError::Config(
                    "exactly one of acl_path / acl_json must be set".into(),
                ))
            }
        }

        self.gateway.validate()?;
        self.hub.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            AclBusError::Config(format!("gateway.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "127.0.0.1:8082".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HubSection {
    /// Per-subscriber queue length before events are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for HubSection {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl HubSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=65536).contains(&self.queue_capacity) {
            return Err(AclBusError::Config(
                "hub.queue_capacity must be between 1 and 65536".into(),
            ));
        }
        Ok(())
    }
}

fn default_queue_capacity() -> usize {
    256
}
