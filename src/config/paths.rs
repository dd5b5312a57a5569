//! Per-user application data directory resolution.

use std::path::{Path, PathBuf};

use crate::platform::Platform;

use super::defaults::{CLI_APP_NAME, CLI_CONFIG_FILE_NAME, CODEX_APP_NAME};

/// Resolve the app-data directory for `app` on `platform`.
///
/// - Windows: `%APPDATA%\<app>`
/// - Darwin: `~/Library/Application Support/<app>`
/// - other: `~/.<app>`
pub fn app_data_dir(platform: Platform, app: &str) -> Option<PathBuf> {
    let base = match platform {
        Platform::Windows => std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .or_else(dirs::config_dir)?,
        Platform::Darwin | Platform::Linux => dirs::home_dir()?,
    };
    Some(app_data_dir_from(platform, &base, app))
}

/// Pure form of [`app_data_dir`] given `%APPDATA%` (Windows) or `$HOME`.
pub fn app_data_dir_from(platform: Platform, base: &Path, app: &str) -> PathBuf {
    match platform {
        Platform::Windows => base.join(app),
        Platform::Darwin => base.join("Library").join("Application Support").join(app),
        Platform::Linux => base.join(format!(".{app}")),
    }
}

/// Default install root for the managed node.
pub fn default_codex_root(platform: Platform) -> Option<PathBuf> {
    app_data_dir(platform, CODEX_APP_NAME)
}

/// Default location of the persisted CLI configuration.
pub fn default_cli_config_path(platform: Platform) -> Option<PathBuf> {
    app_data_dir(platform, CLI_APP_NAME).map(|dir| dir.join(CLI_CONFIG_FILE_NAME))
}

/// Render a path with forward slashes for the node's config file.
pub(super) fn forward_slashes(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_prepends_dot_to_app_dir() {
        let dir = app_data_dir_from(Platform::Linux, Path::new("/home/op"), "codex-cli");
        assert_eq!(dir, PathBuf::from("/home/op/.codex-cli"));
    }

    #[test]
    fn darwin_uses_application_support() {
        let dir = app_data_dir_from(Platform::Darwin, Path::new("/Users/op"), "codex");
        assert_eq!(
            dir,
            PathBuf::from("/Users/op/Library/Application Support/codex")
        );
    }

    #[test]
    fn windows_joins_app_under_appdata() {
        let dir = app_data_dir_from(Platform::Windows, Path::new("/appdata"), "codex");
        assert_eq!(dir, PathBuf::from("/appdata/codex"));
    }

    #[test]
    fn forward_slashes_replaces_backslashes() {
        assert_eq!(
            forward_slashes(Path::new(r"C:\path\codex.log")),
            "C:/path/codex.log"
        );
    }
}
