//! Configuration data model.
//!
//! This module holds the persisted record only. Loading, validation and the
//! derived paths live on `ConfigStore` in `config::mod`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::{
    DEFAULT_API_PORT, DEFAULT_DISC_PORT, DEFAULT_LISTEN_PORT, DEFAULT_STORAGE_QUOTA,
};

/// Persisted CLI configuration (`config.json`).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Install and working directory of the managed node.
    pub codex_root: PathBuf,
    /// Bytes the node may use for stored data.
    pub storage_quota: u64,
    pub ports: Ports,
    /// Launch the node with marketplace persistence flags.
    #[serde(default)]
    pub marketplace_client: bool,
}

impl Configuration {
    /// Default record rooted at `codex_root`.
    pub fn with_root(codex_root: PathBuf) -> Self {
        Self {
            codex_root,
            storage_quota: DEFAULT_STORAGE_QUOTA,
            ports: Ports::default(),
            marketplace_client: false,
        }
    }
}

/// The three ports the node binds.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ports {
    /// UDP discovery port.
    pub disc_port: u16,
    /// TCP libp2p listen port.
    pub listen_port: u16,
    /// Local REST API port.
    pub api_port: u16,
}

impl Default for Ports {
    fn default() -> Self {
        Self {
            disc_port: DEFAULT_DISC_PORT,
            listen_port: DEFAULT_LISTEN_PORT,
            api_port: DEFAULT_API_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let config = Configuration::with_root(PathBuf::from("/r"));
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["codexRoot"], "/r");
        assert_eq!(value["storageQuota"], DEFAULT_STORAGE_QUOTA);
        assert_eq!(value["ports"]["discPort"], 8090);
        assert_eq!(value["ports"]["listenPort"], 8070);
        assert_eq!(value["ports"]["apiPort"], 8080);
        assert_eq!(value["marketplaceClient"], false);
    }

    #[test]
    fn marketplace_flag_defaults_when_absent() {
        let raw = r#"{"codexRoot":"/r","storageQuota":1,"ports":{"discPort":1,"listenPort":2,"apiPort":3}}"#;
        let config: Configuration = serde_json::from_str(raw).unwrap();
        assert!(!config.marketplace_client);
        assert_eq!(config.ports.listen_port, 2);
    }

    #[test]
    fn missing_root_fails_to_parse() {
        let raw = r#"{"storageQuota":1,"ports":{"discPort":1,"listenPort":2,"apiPort":3}}"#;
        assert!(serde_json::from_str::<Configuration>(raw).is_err());
    }
}
