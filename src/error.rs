//! Unified error types for the CLI.

use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// ShellError
// ---------------------------------------------------------------------------

/// Errors from running a command through the OS shell.
#[derive(Debug)]
pub enum ShellError {
    /// The shell (or program) could not be started at all.
    Spawn {
        command: String,
        source: std::io::Error,
    },
    /// The command ran and exited with a non-zero status.
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { command, source } => write!(f, "failed to run `{command}`: {source}"),
            Self::NonZeroExit {
                command,
                code,
                stderr,
            } => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                let stderr = stderr.trim();
                if stderr.is_empty() {
                    write!(f, "`{command}` exited with {code}")
                } else {
                    write!(f, "`{command}` exited with {code}: {stderr}")
                }
            }
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            Self::NonZeroExit { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A configuration invariant was violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Storage quota below the 100 MiB floor.
    QuotaTooSmall { requested: u64 },
    /// A port outside 1024..=65535.
    PortOutOfRange { port: &'static str, requested: u64 },
    /// A required value is unset.
    MissingValue(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuotaTooSmall { requested } => write!(
                f,
                "storage quota {requested} bytes is below the 100MB minimum"
            ),
            Self::PortOutOfRange { port, requested } => write!(
                f,
                "{port} {requested} is outside the allowed range 1024-65535"
            ),
            Self::MissingValue(name) => write!(f, "missing config value: {name}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// PersistenceError
// ---------------------------------------------------------------------------

/// Errors reading or writing files owned by the CLI.
#[derive(Debug)]
pub enum PersistenceError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// No per-user application data directory on this platform.
    NoAppDataDir,
}

impl PersistenceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json { path, source } => write!(f, "{}: json: {source}", path.display()),
            Self::NoAppDataDir => write!(f, "unable to resolve the application data directory"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::NoAppDataDir => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors from HTTP collaborators (node API, network info).
#[derive(Debug)]
pub enum ApiError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status.
    Status(u16, String),
    /// Local file I/O around an upload or download.
    Io(std::io::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code, body) => write!(f, "status {code}: {body}"),
            Self::Io(e) => write!(f, "io: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// PromptError
// ---------------------------------------------------------------------------

/// Errors reading operator input.
#[derive(Debug)]
pub enum PromptError {
    /// Stdin reached end-of-file.
    Closed,
    Io(std::io::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "input closed"),
            Self::Io(e) => write!(f, "input: {e}"),
        }
    }
}

impl std::error::Error for PromptError {}

impl From<std::io::Error> for PromptError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// CodexError: top-level
// ---------------------------------------------------------------------------

/// Top-level error type for install and process-control operations.
#[derive(Debug)]
pub enum CodexError {
    Shell(ShellError),
    /// The managed binary is absent or printed no version text.
    NotInstalled(String),
    /// The installer ran but the binary is still not usable.
    InstallationFailed,
    /// Stop requested while no managed process is running.
    NoProcessFound,
    /// The OS refused to deliver a signal.
    Signal { pid: u32, message: String },
    Config(ConfigError),
    Persistence(PersistenceError),
    Api(ApiError),
}

impl fmt::Display for CodexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shell(e) => write!(f, "shell: {e}"),
            Self::NotInstalled(msg) => write!(f, "{msg}"),
            Self::InstallationFailed => write!(f, "Codex installation failed."),
            Self::NoProcessFound => write!(f, "No codex process found"),
            Self::Signal { pid, message } => write!(f, "failed to signal process {pid}: {message}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Persistence(e) => write!(f, "persistence: {e}"),
            Self::Api(e) => write!(f, "api: {e}"),
        }
    }
}

impl std::error::Error for CodexError {}

impl From<ShellError> for CodexError {
    fn from(e: ShellError) -> Self {
        Self::Shell(e)
    }
}

impl From<ConfigError> for CodexError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<PersistenceError> for CodexError {
    fn from(e: PersistenceError) -> Self {
        Self::Persistence(e)
    }
}

impl From<ApiError> for CodexError {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}
