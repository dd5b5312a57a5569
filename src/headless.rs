//! One-shot commands for scripted use (`--install`, `--start`, ...).
//!
//! Each command runs against the same services as the menus and maps the
//! outcome to a process exit code.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::error;

use crate::context::AppContext;
use crate::installer::{InstallOutcome, InstallProgress};
use crate::menu::NodeState;
use crate::process::StopOutcome;
use crate::ui::Ui;

/// One headless action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessCommand {
    Install,
    Start,
    Stop,
    Status,
    Upload(PathBuf),
    Download(String),
}

/// Plain message output for installs without a menu.
pub struct HeadlessProgress {
    ui: Arc<dyn Ui>,
}

impl HeadlessProgress {
    pub fn new(ui: Arc<dyn Ui>) -> Self {
        Self { ui }
    }
}

impl InstallProgress for HeadlessProgress {
    fn install_starts(&mut self) {
        self.ui.show_info("Installing Codex...");
    }

    fn download_successful(&mut self) {
        self.ui.show_info("Installer downloaded.");
    }

    fn install_successful(&mut self) {
        self.ui.show_success("Codex installed successfully.");
    }

    fn warn(&mut self, message: &str) {
        self.ui.show_error(message);
    }
}

/// Run `command` and return the exit code.
pub async fn run_headless(ctx: &mut AppContext, command: HeadlessCommand) -> i32 {
    let ui = ctx.ui.clone();
    match command {
        HeadlessCommand::Install => {
            let mut progress = HeadlessProgress::new(ui.clone());
            match ctx.installer.install(&ctx.config, &mut progress).await {
                Ok(InstallOutcome::Installed) => 0,
                Ok(InstallOutcome::Aborted) => 1,
                Err(err) => fail(ui.as_ref(), &format!("Failed to install Codex. \"{err}\"")),
            }
        }
        HeadlessCommand::Start => {
            if !ctx.is_installed().await {
                return fail(ui.as_ref(), "Codex is not yet installed.");
            }
            if ctx.is_running() {
                return fail(ui.as_ref(), "Codex is running.");
            }
            match ctx.process.start(&ctx.config).await {
                Ok(pid) => {
                    ui.show_success(&format!("Codex node started (pid {pid})."));
                    0
                }
                Err(err) => fail(ui.as_ref(), &format!("Failed to start Codex. \"{err}\"")),
            }
        }
        HeadlessCommand::Stop => match ctx.process.stop(&ctx.config).await {
            Ok(StopOutcome::Interrupted { pid }) | Ok(StopOutcome::Terminated { pid }) => {
                ui.show_success(&format!("Codex node stopped (pid {pid})."));
                0
            }
            Err(err) => fail(ui.as_ref(), &format!("Failed to stop Codex. \"{err}\"")),
        },
        HeadlessCommand::Status => {
            let state = NodeState::detect(ctx).await;
            let message = match state {
                NodeState::NotInstalled => "Codex is not yet installed.".to_string(),
                NodeState::Stopped => "Codex is installed but not running.".to_string(),
                NodeState::Running => match ctx.node.debug_info(ctx.api_port()).await {
                    Ok(info) => format!(
                        "Codex is running with {} peers ({}).",
                        info.peer_count(),
                        info.codex.version
                    ),
                    Err(err) => {
                        error!(%err, "debug/info request failed");
                        "Codex is running; node API not reachable.".to_string()
                    }
                },
            };
            ui.show_info(&message);
            0
        }
        HeadlessCommand::Upload(path) => {
            if !ctx.is_running() {
                return fail(ui.as_ref(), "Codex is not yet running.");
            }
            if !path.is_file() {
                return fail(ui.as_ref(), "File not found");
            }
            match ctx.node.upload(ctx.api_port(), &path).await {
                Ok(cid) => {
                    ui.show_success(&format!("Upload successful.\n CID: '{cid}'"));
                    0
                }
                Err(err) => fail(ui.as_ref(), &format!("Error during upload: {err}")),
            }
        }
        HeadlessCommand::Download(cid) => {
            if !ctx.is_running() {
                return fail(ui.as_ref(), "Codex is not yet running.");
            }
            match ctx
                .node
                .download(ctx.api_port(), &cid, &ctx.download_dir)
                .await
            {
                Ok(file) => {
                    ui.show_success(&format!("Download successful.\n File: '{}'", file.display()));
                    0
                }
                Err(err) => fail(ui.as_ref(), &format!("Error during download: {err}")),
            }
        }
    }
}

fn fail(ui: &dyn Ui, message: &str) -> i32 {
    ui.show_error(message);
    1
}
