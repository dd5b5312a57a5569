//! Default configuration constants.
//!
//! Keeping defaults in one module lets the store, the menus and the tests
//! share the same literals.

/// Smallest storage quota the node is allowed to run with (100 MiB).
pub const MIN_STORAGE_QUOTA: u64 = 100 * 1024 * 1024;
/// Storage quota written on first run (8 GiB).
pub const DEFAULT_STORAGE_QUOTA: u64 = 8 * 1024 * 1024 * 1024;
/// Lowest non-privileged port accepted for any of the node's ports.
pub const MIN_PORT: u64 = 1024;
/// Highest valid TCP/UDP port.
pub const MAX_PORT: u64 = 65535;

pub const DEFAULT_DISC_PORT: u16 = 8090;
pub const DEFAULT_LISTEN_PORT: u16 = 8070;
pub const DEFAULT_API_PORT: u16 = 8080;

/// App-data directory name for the node install root.
pub(super) const CODEX_APP_NAME: &str = "codex";
/// App-data directory name for this CLI's own state.
pub(super) const CLI_APP_NAME: &str = "codex-cli";
/// File name of the persisted CLI configuration.
pub(super) const CLI_CONFIG_FILE_NAME: &str = "config.json";
