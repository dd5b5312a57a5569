//! Services shared by every menu and headless command.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ConfigStore;
use crate::installer::Installer;
use crate::node_api::NodeApi;
use crate::process::ProcessControl;
use crate::session::Session;
use crate::shell::ShellRunner;
use crate::ui::Ui;

/// Opens a URL in the desktop browser; `false` when nothing could be launched.
pub type UrlOpener = fn(&str) -> bool;

/// Everything a menu action may touch, owned for the lifetime of one run.
///
/// Menus borrow the context mutably for as long as they are shown; nested
/// menus reborrow it, so there is never more than one writer.
pub struct AppContext {
    pub config: ConfigStore,
    pub installer: Installer,
    pub process: ProcessControl,
    pub node: Arc<dyn NodeApi>,
    pub shell: Arc<dyn ShellRunner>,
    pub ui: Arc<dyn Ui>,
    pub session: Session,
    /// Downloads land here.
    pub download_dir: PathBuf,
    pub open_url: UrlOpener,
}

impl AppContext {
    pub async fn is_installed(&self) -> bool {
        self.installer.is_installed(&self.config).await
    }

    pub fn is_running(&self) -> bool {
        self.process.is_running(&self.config)
    }

    pub fn api_port(&self) -> u16 {
        self.config.get().ports.api_port
    }
}
