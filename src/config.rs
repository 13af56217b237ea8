//! Client configuration.

use std::fs;
use std::path::Path;

use alloy::primitives::Address;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Connection settings for a client instance. The private key is optional;
/// without one, read operations still work but anything requiring a
/// signature fails with a validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// URL of the root node.
    pub root_url: String,
    /// Address of the root-chain contract.
    pub contract_address: Address,
    /// Hex-encoded private key, with or without a `0x` prefix.
    #[serde(default)]
    pub private_key: Option<String>,
}

pub fn load_config_from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<ClientConfig> {
    let s = fs::read_to_string(&path)
        .with_context(|| format!("reading config file {}", path.as_ref().display()))?;
    let cfg: ClientConfig = toml::from_str(&s).context("parsing config file")?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn parses_a_full_config() {
        let cfg: ClientConfig = toml::from_str(
            r#"
            root_url = "http://localhost:6545"
            contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            private_key = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.root_url, "http://localhost:6545");
        assert_eq!(
            cfg.contract_address,
            address!("5FbDB2315678afecb367f032d93F642f64180aa3")
        );
        assert!(cfg.private_key.is_some());
    }

    #[test]
    fn private_key_is_optional() {
        let cfg: ClientConfig = toml::from_str(
            r#"
            root_url = "http://localhost:6545"
            contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            "#,
        )
        .unwrap();
        assert!(cfg.private_key.is_none());
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = load_config_from_path("/nonexistent/plasma.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/plasma.toml"));
    }
}
