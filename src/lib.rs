//! codexstorage: install, configure and run a Codex storage node from the
//! terminal.
//!
//! The crate is split into the services that manage the node binary
//! ([`installer`], [`process`], [`config`], [`shell`]), thin clients for the
//! node's HTTP API and the public testnet services ([`node_api`],
//! [`network`]), and the interactive [`menu`]s that drive them through the
//! [`ui::Ui`] trait.
//!
//! # Quick start
//!
//! ```no_run
//! use codexstorage::config::ConfigStore;
//! use codexstorage::installer::Installer;
//! use codexstorage::platform::Platform;
//! use codexstorage::shell::SystemShell;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let config = ConfigStore::open_default(Platform::current(), None).unwrap();
//! let installer = Installer::new(Arc::new(SystemShell), std::env::current_dir().unwrap());
//! println!("installed: {}", installer.is_installed(&config).await);
//! # }
//! ```

pub mod browser;
pub mod build_info;
pub mod config;
pub mod context;
pub mod error;
pub mod headless;
pub mod installer;
pub mod marketplace;
pub mod menu;
pub mod network;
pub mod node_api;
pub mod platform;
pub mod process;
pub mod session;
pub mod shell;
#[cfg(test)]
pub mod testsupport;
pub mod tui;
pub mod ui;
