//! Editor for quota and ports.
//!
//! Edits go straight into the in-memory record through the guarded setters;
//! "save" persists it and "discard" reloads the file, which drops every edit
//! made since the last save.

use async_trait::async_trait;
use tracing::warn;

use super::menu_loop::{LoopControl, MenuLoop, MenuPrompt};
use super::number_selector::{ask_number, format_bytes};
use crate::config::PortKind;
use crate::context::AppContext;
use crate::error::PromptError;
use crate::ui::{choose, MenuOption};

pub const MSG_QUOTA_TOO_SMALL: &str = "Storage quota should be >= 100MB.";
pub const MSG_PORT_OUT_OF_RANGE: &str = "Port should be between 1024 and 65535.";
pub const MSG_SAVED: &str = "Configuration changes saved.";
pub const MSG_DISCARDED: &str = "Changes discarded.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigAction {
    StorageQuota,
    Port(PortKind),
    Save,
    Discard,
}

struct ConfigPrompt<'a> {
    ctx: &'a mut AppContext,
}

pub async fn show_config_menu(ctx: &mut AppContext) -> Result<(), PromptError> {
    ctx.ui.show_info("Codex Configuration");
    MenuLoop::new(ConfigPrompt { ctx }).show_loop().await
}

#[async_trait]
impl MenuPrompt for ConfigPrompt<'_> {
    async fn prompt(&mut self, control: &mut LoopControl) -> Result<(), PromptError> {
        let config = self.ctx.config.get();
        let options = [
            MenuOption::new(
                format!("Storage quota = {}", format_bytes(config.storage_quota)),
                ConfigAction::StorageQuota,
            ),
            MenuOption::new(
                format!("Discovery port = {}", config.ports.disc_port),
                ConfigAction::Port(PortKind::Discovery),
            ),
            MenuOption::new(
                format!("P2P listen port = {}", config.ports.listen_port),
                ConfigAction::Port(PortKind::Listen),
            ),
            MenuOption::new(
                format!("API port = {}", config.ports.api_port),
                ConfigAction::Port(PortKind::Api),
            ),
            MenuOption::new("Save changes and exit", ConfigAction::Save),
            MenuOption::new("Discard changes and exit", ConfigAction::Discard),
        ];

        match choose(self.ctx.ui.as_ref(), "Select to edit:", &options)? {
            ConfigAction::StorageQuota => self.edit_storage_quota()?,
            ConfigAction::Port(kind) => self.edit_port(kind)?,
            ConfigAction::Save => match self.ctx.config.save() {
                Ok(()) => {
                    self.ctx.ui.show_info(MSG_SAVED);
                    control.stop_loop();
                }
                Err(err) => self
                    .ctx
                    .ui
                    .show_error(&format!("Failed to save configuration: {err}")),
            },
            ConfigAction::Discard => {
                if let Err(err) = self.ctx.config.load() {
                    warn!(%err, "reload after discard failed");
                    self.ctx
                        .ui
                        .show_error(&format!("Failed to reload configuration: {err}"));
                } else {
                    self.ctx.ui.show_info(MSG_DISCARDED);
                }
                control.stop_loop();
            }
        }
        Ok(())
    }
}

impl ConfigPrompt<'_> {
    fn edit_storage_quota(&mut self) -> Result<(), PromptError> {
        let ui = self.ctx.ui.clone();
        ui.show_info("You can use: 'GB' or 'gb', etc.");
        let current = self.ctx.config.get().storage_quota;
        let requested = ask_number(ui.as_ref(), current, "Storage quota", true)?;
        if self.ctx.config.set_storage_quota(requested).is_err() {
            ui.show_error(MSG_QUOTA_TOO_SMALL);
        }
        Ok(())
    }

    fn edit_port(&mut self, kind: PortKind) -> Result<(), PromptError> {
        let ui = self.ctx.ui.clone();
        let ports = &self.ctx.config.get().ports;
        let current = match kind {
            PortKind::Discovery => ports.disc_port,
            PortKind::Listen => ports.listen_port,
            PortKind::Api => ports.api_port,
        };
        let requested = ask_number(ui.as_ref(), u64::from(current), kind.label(), false)?;
        if self.ctx.config.set_port(kind, requested).is_err() {
            ui.show_error(MSG_PORT_OUT_OF_RANGE);
        }
        Ok(())
    }
}
