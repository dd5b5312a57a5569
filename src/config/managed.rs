//! Rendering of the node's own `config.toml`.
//!
//! The node reads this file at startup via `--config-file`. Only settings the
//! node accepts from a config file belong here; marketplace persistence flags
//! are passed on the command line instead.

use std::path::Path;

use super::paths::forward_slashes;
use super::Configuration;

/// Inputs resolved at launch time rather than stored in the record.
#[derive(Debug, Clone, Copy)]
pub(super) struct ManagedConfigInputs<'a> {
    pub data_dir: &'a Path,
    pub log_file: &'a Path,
    pub public_ip: &'a str,
    pub bootstrap_nodes: &'a [String],
}

/// Render the ten `key=value` lines, each newline-terminated.
pub(super) fn render_managed_config(
    config: &Configuration,
    inputs: ManagedConfigInputs<'_>,
) -> String {
    let bootstrap = inputs
        .bootstrap_nodes
        .iter()
        .map(|node| format!("\"{node}\""))
        .collect::<Vec<_>>()
        .join(",");

    let lines = [
        format!("data-dir=\"{}\"", forward_slashes(inputs.data_dir)),
        "log-level=\"DEBUG\"".to_string(),
        format!("log-file=\"{}\"", forward_slashes(inputs.log_file)),
        format!("storage-quota={}", config.storage_quota),
        format!("disc-port={}", config.ports.disc_port),
        format!(
            "listen-addrs=[\"/ip4/0.0.0.0/tcp/{}\"]",
            config.ports.listen_port
        ),
        format!("api-port={}", config.ports.api_port),
        format!("nat=\"extip:{}\"", inputs.public_ip),
        "api-cors-origin=\"*\"".to_string(),
        format!("bootstrap-node=[{bootstrap}]"),
    ];

    let mut out = String::new();
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}
