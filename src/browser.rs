//! Best-effort browser launching for the feedback form and the web app.

/// Open `url` in the desktop browser. Returns `false` if no launcher worked.
pub fn try_open_browser(url: &str) -> bool {
    #[cfg(target_os = "macos")]
    {
        return std::process::Command::new("open")
            .arg(url)
            .status()
            .is_ok_and(|status| status.success());
    }
    #[cfg(target_os = "windows")]
    {
        // Empty title argument keeps `start` from treating the URL as one.
        return std::process::Command::new("cmd")
            .args(["/C", "start", "", url])
            .status()
            .is_ok_and(|status| status.success());
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        return std::process::Command::new("xdg-open")
            .arg(url)
            .status()
            .is_ok_and(|status| status.success());
    }
    #[allow(unreachable_code)]
    false
}

/// Web UI for a node whose REST API listens on `api_port`.
pub fn codex_app_url(api_port: u16) -> String {
    format!("https://releases-v0-0-14.codex-marketplace-ui.pages.dev/?api-port={api_port}")
}

pub const FEEDBACK_URL: &str = "https://tally.so/r/w2DlXb";
