//! CLI argument parsing via clap.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use codexstorage::headless::HeadlessCommand;

/// Install, configure and run a Codex storage node.
#[derive(Debug, Parser)]
#[command(name = "codexstorage", version = codexstorage::build_info::VERSION)]
#[command(long_version = codexstorage::build_info::LONG_VERSION)]
#[command(group(
    ArgGroup::new("headless")
        .args(["install", "start", "stop", "status", "upload", "download"])
        .multiple(false)
))]
pub struct Args {
    /// Path to the CLI config file (default: per-user app-data directory).
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Download and install Codex, then exit.
    #[arg(long)]
    pub install: bool,

    /// Start the node, then exit. The node keeps running.
    #[arg(long)]
    pub start: bool,

    /// Stop the running node, then exit.
    #[arg(long)]
    pub stop: bool,

    /// Print whether the node is installed and running.
    #[arg(long)]
    pub status: bool,

    /// Upload a file to the running node and print its CID.
    #[arg(long, value_name = "FILE")]
    pub upload: Option<PathBuf>,

    /// Download a CID from the network into the current directory.
    #[arg(long, value_name = "CID")]
    pub download: Option<String>,
}

impl Args {
    /// The headless action selected by flags, if any.
    pub fn headless_command(&self) -> Option<HeadlessCommand> {
        if self.install {
            Some(HeadlessCommand::Install)
        } else if self.start {
            Some(HeadlessCommand::Start)
        } else if self.stop {
            Some(HeadlessCommand::Stop)
        } else if self.status {
            Some(HeadlessCommand::Status)
        } else if let Some(file) = &self.upload {
            Some(HeadlessCommand::Upload(file.clone()))
        } else {
            self.download.clone().map(HeadlessCommand::Download)
        }
    }
}
