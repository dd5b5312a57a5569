//! Top-level menu.
//!
//! The option list depends on the node's state when the menu is shown. State
//! can change between showing the menu and acting on a choice (another
//! terminal may stop the node), so every action re-checks its precondition.

use async_trait::async_trait;
use tracing::{info, warn};

use super::config_menu::show_config_menu;
use super::data_menu::{perform_download, perform_upload, show_local_data};
use super::install_menu::{show_install_menu, show_uninstall_menu};
use super::marketplace_menu::run_marketplace_setup;
use super::menu_loop::{LoopControl, MenuLoop, MenuPrompt};
use super::node_status_menu::show_node_status;
use crate::browser::{codex_app_url, FEEDBACK_URL};
use crate::context::AppContext;
use crate::error::PromptError;
use crate::process::StopOutcome;
use crate::ui::{choose, MenuOption};

pub const MSG_NOT_INSTALLED: &str = "Codex is not yet installed.";
pub const MSG_INSTALLED: &str = "Codex is installed.";
pub const MSG_NOT_RUNNING: &str = "Codex is not yet running.";
pub const MSG_RUNNING: &str = "Codex is running.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainAction {
    Install,
    Start,
    EditConfig,
    MarketplaceSetup,
    Uninstall,
    Status,
    Upload,
    Download,
    LocalData,
    OpenApp,
    Stop,
    Feedback,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Installed,
    NotInstalled,
    Running,
    NotRunning,
}

/// Which option set the menu shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    NotInstalled,
    Stopped,
    Running,
}

impl NodeState {
    pub async fn detect(ctx: &AppContext) -> Self {
        // A running node keeps its menu even if the binary vanished, so it
        // can still be stopped.
        if ctx.is_running() {
            Self::Running
        } else if ctx.is_installed().await {
            Self::Stopped
        } else {
            Self::NotInstalled
        }
    }
}

struct MainPrompt<'a> {
    ctx: &'a mut AppContext,
}

/// Show the logo, then loop over the main menu until the operator exits.
pub async fn show_main_menu(ctx: &mut AppContext) -> Result<(), PromptError> {
    ctx.ui.show_logo();
    MenuLoop::new(MainPrompt { ctx }).show_loop().await
}

fn options_for(state: NodeState) -> Vec<MenuOption<MainAction>> {
    let mut options = match state {
        NodeState::NotInstalled => vec![MenuOption::new(
            "Download and install Codex",
            MainAction::Install,
        )],
        NodeState::Stopped => vec![
            MenuOption::new("Start Codex node", MainAction::Start),
            MenuOption::new("Edit Codex configuration", MainAction::EditConfig),
            MenuOption::new("Marketplace client setup", MainAction::MarketplaceSetup),
            MenuOption::new("Uninstall Codex node", MainAction::Uninstall),
        ],
        NodeState::Running => vec![
            MenuOption::new("Check node status", MainAction::Status),
            MenuOption::new("Upload a file", MainAction::Upload),
            MenuOption::new("Download a file", MainAction::Download),
            MenuOption::new("Show local data", MainAction::LocalData),
            MenuOption::new("Open Codex app", MainAction::OpenApp),
            MenuOption::new("Stop Codex node", MainAction::Stop),
        ],
    };
    options.push(MenuOption::new("Submit feedback", MainAction::Feedback));
    options.push(MenuOption::new("Exit", MainAction::Exit));
    options
}

#[async_trait]
impl MenuPrompt for MainPrompt<'_> {
    async fn prompt(&mut self, control: &mut LoopControl) -> Result<(), PromptError> {
        let state = NodeState::detect(self.ctx).await;
        let message = match self.ctx.session.eth_address() {
            Some(address) => format!("Select an option (account {address})"),
            None => "Select an option".to_string(),
        };
        let action = choose(self.ctx.ui.as_ref(), &message, &options_for(state))?;

        match action {
            MainAction::Install => {
                if self.gate(Gate::NotInstalled).await {
                    show_install_menu(self.ctx).await?;
                }
            }
            MainAction::Start => {
                if self.gate(Gate::Installed).await && self.gate(Gate::NotRunning).await {
                    self.start_node().await;
                }
            }
            MainAction::EditConfig => {
                if self.gate(Gate::NotRunning).await {
                    show_config_menu(self.ctx).await?;
                }
            }
            MainAction::MarketplaceSetup => {
                if self.gate(Gate::Installed).await && self.gate(Gate::NotRunning).await {
                    run_marketplace_setup(self.ctx).await?;
                }
            }
            MainAction::Uninstall => {
                if self.gate(Gate::Installed).await && self.gate(Gate::NotRunning).await {
                    show_uninstall_menu(self.ctx).await?;
                }
            }
            MainAction::Status => {
                if self.gate(Gate::Running).await {
                    show_node_status(self.ctx).await?;
                }
            }
            MainAction::Upload => {
                if self.gate(Gate::Running).await {
                    perform_upload(self.ctx).await?;
                }
            }
            MainAction::Download => {
                if self.gate(Gate::Running).await {
                    perform_download(self.ctx).await?;
                }
            }
            MainAction::LocalData => {
                if self.gate(Gate::Running).await {
                    show_local_data(self.ctx).await?;
                }
            }
            MainAction::OpenApp => {
                if self.gate(Gate::Running).await {
                    self.open_app();
                }
            }
            MainAction::Stop => {
                if self.gate(Gate::Running).await {
                    self.stop_node().await;
                }
            }
            MainAction::Feedback => self.open_feedback(),
            MainAction::Exit => control.stop_loop(),
        }
        Ok(())
    }
}

impl MainPrompt<'_> {
    /// `true` when the node is in the required state; otherwise tells the
    /// operator which state it is actually in.
    async fn gate(&self, gate: Gate) -> bool {
        let (passed, message) = match gate {
            Gate::Installed => (self.ctx.is_installed().await, MSG_NOT_INSTALLED),
            Gate::NotInstalled => (!self.ctx.is_installed().await, MSG_INSTALLED),
            Gate::Running => (self.ctx.is_running(), MSG_NOT_RUNNING),
            Gate::NotRunning => (!self.ctx.is_running(), MSG_RUNNING),
        };
        if !passed {
            self.ctx.ui.show_info(message);
        }
        passed
    }

    async fn start_node(&mut self) {
        let mut spinner = self.ctx.ui.spinner("Starting...");
        let result = self.ctx.process.start(&self.ctx.config).await;
        spinner.finish();
        match result {
            Ok(pid) => {
                info!(pid, "node started from menu");
                self.ctx.ui.show_success("Codex node started.");
            }
            Err(err) => {
                warn!(%err, "start failed");
                self.ctx
                    .ui
                    .show_error(&format!("Failed to start Codex. \"{err}\""));
            }
        }
    }

    async fn stop_node(&mut self) {
        let mut spinner = self.ctx.ui.spinner("Stopping...");
        let result = self.ctx.process.stop(&self.ctx.config).await;
        spinner.finish();
        match result {
            Ok(StopOutcome::Interrupted { .. }) => self.ctx.ui.show_success("Codex node stopped."),
            Ok(StopOutcome::Terminated { .. }) => self
                .ctx
                .ui
                .show_success("Codex node did not exit on interrupt and was terminated."),
            Err(err) => {
                warn!(%err, "stop failed");
                self.ctx
                    .ui
                    .show_error(&format!("Failed to stop Codex. \"{err}\""));
            }
        }
    }

    fn open_feedback(&self) {
        self.ctx
            .ui
            .show_info("Opening feedback form in your browser...");
        if !(self.ctx.open_url)(FEEDBACK_URL) {
            self.ctx
                .ui
                .show_info(&format!("Please open this link manually: {FEEDBACK_URL}"));
        }
    }

    fn open_app(&self) {
        let url = codex_app_url(self.ctx.api_port());
        self.ctx.ui.show_info("Opening Codex app in your browser...");
        if !(self.ctx.open_url)(&url) {
            self.ctx
                .ui
                .show_info(&format!("Please open this link manually: {url}"));
        }
    }
}
