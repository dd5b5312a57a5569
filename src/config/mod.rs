//! CLI configuration: the persisted JSON record and everything derived from it.
//!
//! The record has a draft/commit lifecycle. Setters mutate the in-memory copy
//! only; [`ConfigStore::save`] makes edits durable and [`ConfigStore::load`]
//! discards them by re-reading the file.

use crate::error::{CodexError, ConfigError, PersistenceError};
use crate::platform::Platform;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

mod defaults;
mod managed;
mod paths;
mod types;

pub use defaults::{
    DEFAULT_API_PORT, DEFAULT_DISC_PORT, DEFAULT_LISTEN_PORT, DEFAULT_STORAGE_QUOTA, MAX_PORT,
    MIN_PORT, MIN_STORAGE_QUOTA,
};
use managed::{render_managed_config, ManagedConfigInputs};
pub use paths::{app_data_dir, app_data_dir_from, default_cli_config_path, default_codex_root};
pub use types::{Configuration, Ports};

/// Locations of the marketplace Ethereum key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EthKeyPaths {
    pub key: PathBuf,
    pub address: PathBuf,
}

/// Which of the node's three ports an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    Discovery,
    Listen,
    Api,
}

impl PortKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Discovery => "Discovery port",
            Self::Listen => "Listen port",
            Self::Api => "API port",
        }
    }
}

/// Owns the in-memory configuration and its JSON file.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    defaults: Configuration,
    platform: Platform,
    config: Configuration,
}

impl ConfigStore {
    /// Open the store at `path`, loading (or materializing) the record.
    pub fn open(
        path: PathBuf,
        defaults: Configuration,
        platform: Platform,
    ) -> Result<Self, PersistenceError> {
        let mut store = Self {
            path,
            config: defaults.clone(),
            defaults,
            platform,
        };
        store.load()?;
        Ok(store)
    }

    /// Open the store at the per-user default location, or at `path_override`.
    pub fn open_default(
        platform: Platform,
        path_override: Option<PathBuf>,
    ) -> Result<Self, PersistenceError> {
        let path = match path_override {
            Some(path) => path,
            None => default_cli_config_path(platform).ok_or(PersistenceError::NoAppDataDir)?,
        };
        let root = default_codex_root(platform).ok_or(PersistenceError::NoAppDataDir)?;
        Self::open(path, Configuration::with_root(root), platform)
    }

    pub fn get(&self) -> &Configuration {
        &self.config
    }

    /// Path of the persisted JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Re-read the JSON file.
    ///
    /// An absent file, unparsable JSON, or a record without `codexRoot` is
    /// replaced with the defaults, which are written back immediately.
    pub fn load(&mut self) -> Result<(), PersistenceError> {
        match read_config(&self.path) {
            Ok(Some(config)) => {
                debug!(path = %self.path.display(), "loaded configuration");
                self.config = config;
                Ok(())
            }
            Ok(None) => {
                info!(path = %self.path.display(), "writing default configuration");
                self.config = self.defaults.clone();
                self.save()
            }
            Err(err) => {
                error!(%err, "failed to load configuration");
                Err(err)
            }
        }
    }

    /// Persist the in-memory record.
    pub fn save(&self) -> Result<(), PersistenceError> {
        write_config(&self.path, &self.config).inspect_err(|err| {
            error!(%err, "failed to save configuration");
        })
    }

    // -- derived paths -----------------------------------------------------

    pub fn executable_path(&self) -> PathBuf {
        self.config
            .codex_root
            .join(self.platform.executable_name())
    }

    pub fn generated_config_file_path(&self) -> PathBuf {
        self.config.codex_root.join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.config.codex_root.join("datadir")
    }

    pub fn log_file_path(&self) -> PathBuf {
        self.config.codex_root.join("logs").join("codex.log")
    }

    pub fn eth_key_file_paths(&self) -> EthKeyPaths {
        EthKeyPaths {
            key: self.config.codex_root.join("eth.key"),
            address: self.config.codex_root.join("eth.address"),
        }
    }

    // -- validation --------------------------------------------------------

    /// Check the record against its invariants, reporting the first failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.config.storage_quota < MIN_STORAGE_QUOTA {
            return Err(ConfigError::QuotaTooSmall {
                requested: self.config.storage_quota,
            });
        }
        if self.config.codex_root.as_os_str().is_empty() {
            return Err(ConfigError::MissingValue("codexRoot"));
        }
        let ports = self.config.ports;
        for (kind, port) in [
            (PortKind::Discovery, ports.disc_port),
            (PortKind::Listen, ports.listen_port),
            (PortKind::Api, ports.api_port),
        ] {
            check_port(kind, u64::from(port))?;
        }
        Ok(())
    }

    /// Validate, then write the node's `config.toml` and return its path.
    pub fn write_managed_config_file(
        &self,
        public_ip: &str,
        bootstrap_nodes: &[String],
    ) -> Result<PathBuf, CodexError> {
        self.validate()?;

        let target = self.generated_config_file_path();
        let data_dir = self.data_dir();
        let log_file = self.log_file_path();
        let text = render_managed_config(
            &self.config,
            ManagedConfigInputs {
                data_dir: &data_dir,
                log_file: &log_file,
                public_ip,
                bootstrap_nodes,
            },
        );

        if let Some(logs) = log_file.parent() {
            std::fs::create_dir_all(logs).map_err(|e| PersistenceError::io(logs, e))?;
        }
        std::fs::write(&target, text).map_err(|e| PersistenceError::io(&target, e))?;
        debug!(path = %target.display(), "wrote node config file");
        Ok(target)
    }

    // -- guarded setters ---------------------------------------------------

    /// Set the storage quota; values below 100 MiB are rejected.
    pub fn set_storage_quota(&mut self, bytes: u64) -> Result<(), ConfigError> {
        if bytes < MIN_STORAGE_QUOTA {
            warn!(bytes, "rejected storage quota");
            return Err(ConfigError::QuotaTooSmall { requested: bytes });
        }
        self.config.storage_quota = bytes;
        Ok(())
    }

    /// Set one of the node ports; values outside 1024..=65535 are rejected.
    pub fn set_port(&mut self, kind: PortKind, value: u64) -> Result<(), ConfigError> {
        let port = check_port(kind, value).inspect_err(|_| {
            warn!(port = kind.label(), value, "rejected port");
        })?;
        let ports = &mut self.config.ports;
        match kind {
            PortKind::Discovery => ports.disc_port = port,
            PortKind::Listen => ports.listen_port = port,
            PortKind::Api => ports.api_port = port,
        }
        Ok(())
    }

    pub fn set_disc_port(&mut self, value: u64) -> Result<(), ConfigError> {
        self.set_port(PortKind::Discovery, value)
    }

    pub fn set_listen_port(&mut self, value: u64) -> Result<(), ConfigError> {
        self.set_port(PortKind::Listen, value)
    }

    pub fn set_api_port(&mut self, value: u64) -> Result<(), ConfigError> {
        self.set_port(PortKind::Api, value)
    }

    pub fn set_codex_root(&mut self, root: PathBuf) -> Result<(), ConfigError> {
        if root.as_os_str().is_empty() {
            return Err(ConfigError::MissingValue("codexRoot"));
        }
        self.config.codex_root = root;
        Ok(())
    }

    pub fn set_marketplace_client(&mut self, enabled: bool) {
        self.config.marketplace_client = enabled;
    }
}

fn check_port(kind: PortKind, value: u64) -> Result<u16, ConfigError> {
    if !(MIN_PORT..=MAX_PORT).contains(&value) {
        return Err(ConfigError::PortOutOfRange {
            port: kind.label(),
            requested: value,
        });
    }
    u16::try_from(value).map_err(|_| ConfigError::PortOutOfRange {
        port: kind.label(),
        requested: value,
    })
}

/// Read the record; `Ok(None)` means "replace with defaults".
fn read_config(path: &Path) -> Result<Option<Configuration>, PersistenceError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(PersistenceError::io(path, e)),
    };
    match serde_json::from_str::<Configuration>(&raw) {
        Ok(config) if config.codex_root.as_os_str().is_empty() => {
            warn!(path = %path.display(), "configuration has no codexRoot; using defaults");
            Ok(None)
        }
        Ok(config) => Ok(Some(config)),
        Err(err) => {
            warn!(path = %path.display(), %err, "configuration is corrupt; using defaults");
            Ok(None)
        }
    }
}

fn write_config(path: &Path, config: &Configuration) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
    }
    let mut text =
        serde_json::to_string_pretty(config).map_err(|source| PersistenceError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    text.push('\n');
    std::fs::write(path, text).map_err(|e| PersistenceError::io(path, e))
}
