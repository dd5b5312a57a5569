//! Stamps the commit and build date into `--version` and the startup log.
//!
//! Either value can be pinned through the environment for reproducible
//! builds; otherwise git and the clock are asked, falling back to "unknown".

use std::env;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const HASH_VAR: &str = "CODEXSTORAGE_BUILD_GIT_HASH";
const TIME_VAR: &str = "CODEXSTORAGE_BUILD_TIMESTAMP";

fn main() {
    for var in [HASH_VAR, TIME_VAR] {
        println!("cargo:rerun-if-env-changed={var}");
    }
    // Rebuild on commit: HEAD moves on checkout, the ref file on commit.
    println!("cargo:rerun-if-changed=.git/HEAD");
    if let Some(reference) = capture("git", &["symbolic-ref", "-q", "HEAD"]) {
        println!("cargo:rerun-if-changed=.git/{reference}");
    }

    let hash = pinned(HASH_VAR)
        .or_else(|| capture("git", &["rev-parse", "--short=10", "HEAD"]))
        .unwrap_or_else(|| "unknown".into());
    let built = pinned(TIME_VAR)
        .or_else(|| capture("date", &["-u", "+%Y-%m-%d %H:%M UTC"]))
        .unwrap_or_else(epoch_seconds);

    println!("cargo:rustc-env={HASH_VAR}={hash}");
    println!("cargo:rustc-env={TIME_VAR}={built}");
}

fn pinned(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn epoch_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| format!("epoch {}", d.as_secs()))
        .unwrap_or_else(|_| "unknown".into())
}

/// Trimmed stdout of a successful command with non-empty output.
fn capture(program: &str, args: &[&str]) -> Option<String> {
    let out = Command::new(program).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8(out.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
