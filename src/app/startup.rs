//! Logging, signal handling and service construction.

use std::path::PathBuf;
use std::sync::Arc;

use codexstorage::browser::try_open_browser;
use codexstorage::config::ConfigStore;
use codexstorage::context::AppContext;
use codexstorage::error::{CodexError, PersistenceError};
use codexstorage::installer::Installer;
use codexstorage::network::TestnetNetworkInfo;
use codexstorage::node_api::NodeApiClient;
use codexstorage::platform::Platform;
use codexstorage::process::{ProcessControl, SystemProcessInspector};
use codexstorage::session::Session;
use codexstorage::shell::{ShellRunner, SystemShell};
use codexstorage::ui::{TerminalUi, Ui};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "CODEXSTORAGE_LOG";

/// Logs go to stderr at `warn` unless `CODEXSTORAGE_LOG` says otherwise, so
/// they stay out of the menus.
pub(crate) fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Exit with a goodbye on Ctrl-C. A running node is detached and keeps
/// running.
pub(crate) fn spawn_ctrl_c_handler(ui: Arc<dyn Ui>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ui.show_info("Goodbye! The Codex node keeps running in the background if it was started.");
            std::process::exit(0);
        }
    });
}

/// Build the production service graph.
pub(crate) fn build_context(
    config_path: Option<PathBuf>,
    color: bool,
) -> Result<AppContext, CodexError> {
    let platform = Platform::current();
    let config = ConfigStore::open_default(platform, config_path)?;
    let working_dir = std::env::current_dir().map_err(|e| PersistenceError::io(".", e))?;

    let shell: Arc<dyn ShellRunner> = Arc::new(SystemShell);
    let process = ProcessControl::new(
        shell.clone(),
        Arc::new(SystemProcessInspector),
        Arc::new(TestnetNetworkInfo::new()?),
    );

    Ok(AppContext {
        config,
        installer: Installer::new(shell.clone(), working_dir.clone()),
        process,
        node: Arc::new(NodeApiClient::new()?),
        shell,
        ui: Arc::new(TerminalUi::new(color)),
        session: Session::default(),
        download_dir: working_dir,
        open_url: try_open_browser,
    })
}
