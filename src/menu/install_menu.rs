//! Install and uninstall flows.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::config_menu::show_config_menu;
use super::menu_loop::{LoopControl, MenuLoop, MenuPrompt};
use super::path_selector::select_path;
use crate::context::AppContext;
use crate::error::PromptError;
use crate::installer::{InstallOutcome, InstallProgress};
use crate::ui::{choose, MenuOption, ProgressHandle, Ui};

pub const MSG_INSTALLED: &str = "Codex installed successfully.";
pub const MSG_UNINSTALLED: &str = "Codex has been uninstalled.";

/// Spinner-backed progress for the interactive menus.
pub struct InteractiveProgress {
    ui: Arc<dyn Ui>,
    spinner: Option<ProgressHandle>,
}

impl InteractiveProgress {
    pub fn new(ui: Arc<dyn Ui>) -> Self {
        Self { ui, spinner: None }
    }

    fn finish_spinner(&mut self) {
        if let Some(mut spinner) = self.spinner.take() {
            spinner.finish();
        }
    }
}

impl InstallProgress for InteractiveProgress {
    fn install_starts(&mut self) {
        self.spinner = Some(self.ui.spinner("Downloading Codex..."));
    }

    fn download_successful(&mut self) {
        self.finish_spinner();
        self.spinner = Some(self.ui.spinner("Installing Codex..."));
    }

    fn install_successful(&mut self) {
        self.finish_spinner();
        self.ui.show_success(MSG_INSTALLED);
    }

    fn warn(&mut self, message: &str) {
        self.finish_spinner();
        self.ui.show_error(message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InstallAction {
    ChangePath,
    Install,
    Cancel,
}

struct InstallPrompt<'a> {
    ctx: &'a mut AppContext,
    installed: bool,
}

/// Pick an install location and install. After a successful install the
/// config editor is shown so ports and quota can be adjusted right away.
pub async fn show_install_menu(ctx: &mut AppContext) -> Result<(), PromptError> {
    let mut menu = MenuLoop::new(InstallPrompt {
        ctx,
        installed: false,
    });
    menu.show_loop().await?;
    let prompt = menu.into_inner();
    if prompt.installed {
        show_config_menu(prompt.ctx).await?;
    }
    Ok(())
}

#[async_trait]
impl MenuPrompt for InstallPrompt<'_> {
    async fn prompt(&mut self, control: &mut LoopControl) -> Result<(), PromptError> {
        let ui = self.ctx.ui.clone();
        let root = self.ctx.config.get().codex_root.display().to_string();
        let options = [
            MenuOption::new(format!("Install path: {root}"), InstallAction::ChangePath),
            MenuOption::new("Install!", InstallAction::Install),
            MenuOption::new("Cancel", InstallAction::Cancel),
        ];

        match choose(ui.as_ref(), "Configure your Codex installation", &options)? {
            InstallAction::ChangePath => self.change_path().await?,
            InstallAction::Install => {
                self.install().await;
                control.stop_loop();
            }
            InstallAction::Cancel => control.stop_loop(),
        }
        Ok(())
    }
}

impl InstallPrompt<'_> {
    async fn change_path(&mut self) -> Result<(), PromptError> {
        let ui = self.ctx.ui.clone();
        let start = self.ctx.config.get().codex_root.clone();
        let picked = select_path(ui.as_ref(), &start, false).await?;
        if picked == start {
            return Ok(());
        }
        if let Err(err) = self.ctx.config.set_codex_root(picked) {
            ui.show_error(&err.to_string());
            return Ok(());
        }
        if let Err(err) = self.ctx.config.save() {
            ui.show_error(&format!("Failed to save configuration: {err}"));
        }
        Ok(())
    }

    async fn install(&mut self) {
        let mut progress = InteractiveProgress::new(self.ctx.ui.clone());
        match self
            .ctx
            .installer
            .install(&self.ctx.config, &mut progress)
            .await
        {
            Ok(InstallOutcome::Installed) => self.installed = true,
            Ok(InstallOutcome::Aborted) => {}
            Err(err) => {
                warn!(%err, "install failed");
                progress.finish_spinner();
                self.ctx
                    .ui
                    .show_error(&format!("Failed to install Codex. \"{err}\""));
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UninstallChoice {
    Confirm,
    Cancel,
}

/// Ask for confirmation, then delete the install root.
pub async fn show_uninstall_menu(ctx: &mut AppContext) -> Result<(), PromptError> {
    let root = ctx.config.get().codex_root.display().to_string();
    ctx.ui.show_info(&format!(
        "Uninstalling removes '{root}', including the node's data directory."
    ));
    let options = [
        MenuOption::new("Yes, uninstall Codex", UninstallChoice::Confirm),
        MenuOption::new("Cancel", UninstallChoice::Cancel),
    ];
    if choose(ctx.ui.as_ref(), "Are you sure?", &options)? == UninstallChoice::Confirm {
        ctx.installer.uninstall(&ctx.config);
        ctx.ui.show_success(MSG_UNINSTALLED);
    }
    Ok(())
}
