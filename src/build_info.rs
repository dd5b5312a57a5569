//! Compile-time build metadata exposed to CLI surfaces.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("CODEXSTORAGE_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("CODEXSTORAGE_BUILD_TIMESTAMP");

/// Render the one-line metadata shown under the logo.
pub fn startup_metadata_line() -> String {
    format!("v{VERSION} ({GIT_COMMIT}, built {BUILD_TIMESTAMP})")
}

/// Block printed by `codexstorage --version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("CODEXSTORAGE_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("CODEXSTORAGE_BUILD_TIMESTAMP")
);
