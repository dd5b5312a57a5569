//! Installation state machine for the managed node binary.
//!
//! Installed-ness is never cached: each check runs `<exe> --version`. A failed
//! or interrupted install leaves nothing behind that the next attempt has to
//! know about; prerequisites are simply evaluated again.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ConfigStore;
use crate::error::CodexError;
use crate::platform::Platform;
use crate::shell::{quote_path, ShellRunner};

const WINDOWS_DOWNLOAD: &str = "curl -LO --ssl-no-revoke https://get.codex.storage/install.cmd";
const WINDOWS_CLEANUP: &str = "del /f install.cmd";
const UNIX_DOWNLOAD: &str = "curl -# --connect-timeout 10 --max-time 60 -L https://get.codex.storage/install.sh -o install.sh && chmod +x install.sh";
const UNIX_CLEANUP: &str = "rm -f install.sh";
const LIBGOMP_PROBE: &str = "ldconfig -p | grep libgomp";
const CURL_PROBE: &str = "curl --version";

pub const WARN_ALREADY_INSTALLED: &str = "Codex is already installed.";
pub const WARN_ROOT_MISSING: &str = "Root path doesn't exist.";
pub const WARN_NO_CURL: &str = "Curl is not available.";
pub const WARN_NO_LIBGOMP: &str = "libgomp not found.";
pub const WARN_INSTALL_FAILED: &str = "Codex failed to install.";

/// Milestones reported while installing.
///
/// `warn` carries both prerequisite failures and the terminal failure
/// message; the other three are progress markers.
pub trait InstallProgress: Send {
    fn install_starts(&mut self);
    fn download_successful(&mut self);
    fn install_successful(&mut self);
    fn warn(&mut self, message: &str);
}

/// Result of an `install()` call that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    /// A prerequisite failed; a warning was reported and nothing was changed.
    Aborted,
}

pub struct Installer {
    shell: Arc<dyn ShellRunner>,
    /// Directory `install.cmd` is downloaded into on Windows.
    working_dir: PathBuf,
}

impl Installer {
    pub fn new(shell: Arc<dyn ShellRunner>, working_dir: PathBuf) -> Self {
        Self { shell, working_dir }
    }

    pub async fn is_installed(&self, config: &ConfigStore) -> bool {
        match self.get_version(config).await {
            Ok(_) => true,
            Err(err) => {
                debug!(%err, "codex not installed");
                false
            }
        }
    }

    /// Version text printed by the installed binary.
    pub async fn get_version(&self, config: &ConfigStore) -> Result<String, CodexError> {
        let exe = config.executable_path();
        if !exe.is_file() {
            return Err(CodexError::NotInstalled("Codex not installed.".into()));
        }
        let version = self
            .shell
            .run(&format!("{} --version", quote_path(&exe)))
            .await?;
        if version.trim().is_empty() {
            return Err(CodexError::NotInstalled("Version info not found.".into()));
        }
        Ok(version)
    }

    /// Download and run the platform installer into `codexRoot`.
    pub async fn install(
        &self,
        config: &ConfigStore,
        progress: &mut dyn InstallProgress,
    ) -> Result<InstallOutcome, CodexError> {
        let root = config.get().codex_root.clone();
        if let Err(err) = std::fs::create_dir_all(&root) {
            warn!(root = %root.display(), %err, "could not create codex root");
        }

        if !self.prerequisites_met(config, &root, progress).await {
            return Ok(InstallOutcome::Aborted);
        }

        info!(root = %root.display(), "installing codex");
        progress.install_starts();
        let platform = config.platform();
        let proceeded = if platform.is_windows() {
            self.install_windows(&root, progress).await?;
            true
        } else {
            self.install_unix(&root, platform, progress).await?
        };
        if !proceeded {
            return Ok(InstallOutcome::Aborted);
        }

        if !self.is_installed(config).await {
            progress.warn(WARN_INSTALL_FAILED);
            return Err(CodexError::InstallationFailed);
        }
        info!("codex installed");
        progress.install_successful();
        Ok(InstallOutcome::Installed)
    }

    /// Remove `codexRoot` and everything under it. Failures are logged only.
    ///
    /// Callers must ensure the node is stopped first.
    pub fn uninstall(&self, config: &ConfigStore) {
        let root = &config.get().codex_root;
        info!(root = %root.display(), "uninstalling codex");
        if let Err(err) = std::fs::remove_dir_all(root) {
            warn!(root = %root.display(), %err, "failed to remove codex root");
        }
    }

    async fn prerequisites_met(
        &self,
        config: &ConfigStore,
        root: &Path,
        progress: &mut dyn InstallProgress,
    ) -> bool {
        if self.is_installed(config).await {
            progress.warn(WARN_ALREADY_INSTALLED);
            return false;
        }
        if !root.is_dir() {
            progress.warn(WARN_ROOT_MISSING);
            return false;
        }
        if !self.is_curl_available().await {
            progress.warn(WARN_NO_CURL);
            return false;
        }
        true
    }

    async fn is_curl_available(&self) -> bool {
        // A failing probe means "not available", not an install error.
        self.shell
            .run(CURL_PROBE)
            .await
            .is_ok_and(|out| !out.trim().is_empty())
    }

    async fn install_windows(
        &self,
        root: &Path,
        progress: &mut dyn InstallProgress,
    ) -> Result<(), CodexError> {
        let result = async {
            self.shell.run(WINDOWS_DOWNLOAD).await?;
            progress.download_successful();
            self.shell
                .run(&windows_install_command(root, &self.working_dir))
                .await?;
            Ok::<_, CodexError>(())
        }
        .await;
        self.cleanup(WINDOWS_CLEANUP).await;
        result
    }

    /// Returns `false` when a Unix dependency is missing and the install was
    /// abandoned before downloading anything.
    async fn install_unix(
        &self,
        root: &Path,
        platform: Platform,
        progress: &mut dyn InstallProgress,
    ) -> Result<bool, CodexError> {
        if platform == Platform::Linux && !self.has_libgomp().await {
            progress.warn(WARN_NO_LIBGOMP);
            return Ok(false);
        }

        let result = async {
            self.shell.run(UNIX_DOWNLOAD).await?;
            progress.download_successful();
            let command = match platform {
                Platform::Darwin => darwin_install_command(root),
                _ => linux_install_command(root),
            };
            self.shell.run(&command).await?;
            Ok::<_, CodexError>(())
        }
        .await;
        self.cleanup(UNIX_CLEANUP).await;
        result.map(|()| true)
    }

    async fn has_libgomp(&self) -> bool {
        // grep exits non-zero when nothing matches.
        self.shell
            .run(LIBGOMP_PROBE)
            .await
            .is_ok_and(|out| !out.trim().is_empty())
    }

    async fn cleanup(&self, command: &str) {
        if let Err(err) = self.shell.run(command).await {
            warn!(%err, "installer cleanup failed");
        }
    }
}

fn windows_install_command(root: &Path, working_dir: &Path) -> String {
    format!(
        "set \"INSTALL_DIR={}\" && \"{}\\install.cmd\"",
        root.display(),
        working_dir.display()
    )
}

fn linux_install_command(root: &Path) -> String {
    format!(
        "INSTALL_DIR=\"{}\" timeout 120 bash install.sh",
        root.display()
    )
}

/// macOS ships no `timeout`; bound the script with a perl alarm instead.
fn darwin_install_command(root: &Path) -> String {
    format!(
        r#"perl -e '
    eval {{
        local $SIG{{ALRM}} = sub {{ die "timeout\n" }};
        alarm(120);
        system("INSTALL_DIR=\"{}\" bash install.sh");
        alarm(0);
    }};
    die if $@;
'"#,
        root.display()
    )
}
