//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use aclbus_core::error::{AclBusError, Result};
use aclbus_core::Acl;

pub use schema::{GatewayConfig, GatewaySection, HubSection};

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| AclBusError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| AclBusError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load and compile the ACL the config points at.
pub fn load_acl(cfg: &GatewayConfig) -> Result<Acl> {
    match (&cfg.acl_path, &cfg.acl_json) {
        (Some(path), _) => {
            let s = fs::read_to_string(path)
                .map_err(|e| AclBusError::Config(format!("read acl failed ({path}): {e}")))?;
            Acl::from_json(&s)
        }
        (None, Some(inline)) => Acl::from_json(inline),
        (None, None) => Err(AclBusError::Config("no acl configured".into())),
    }
}
