//! Host platform selection.
//!
//! Services take a `Platform` value instead of branching on `cfg!` directly so
//! the Windows and Darwin paths stay testable from any host.

/// Operating-system family the CLI is managing a node for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Darwin,
    Linux,
}

impl Platform {
    /// Platform of the running host. BSDs and other Unixes map to `Linux`.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::Darwin
        } else {
            Self::Linux
        }
    }

    pub fn is_windows(self) -> bool {
        matches!(self, Self::Windows)
    }

    /// File name of the managed node binary.
    pub fn executable_name(self) -> &'static str {
        match self {
            Self::Windows => "codex.exe",
            Self::Darwin | Self::Linux => "codex",
        }
    }
}
