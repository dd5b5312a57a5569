//! OS process listing and signalling.

use crate::error::CodexError;
use sysinfo::{ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System, UpdateKind};
use tracing::{debug, warn};

/// One row of an OS process snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: u32,
    /// Executable name, e.g. `codex` or `codex.exe`.
    pub name: String,
    pub command_line: String,
    /// Zombie/defunct entries that have exited but were not reaped.
    pub defunct: bool,
}

/// Lists processes and delivers stop/terminate requests by PID.
///
/// Implementations hold no state: every call re-queries the OS.
pub trait ProcessInspector: Send + Sync {
    fn list_processes(&self) -> Vec<ProcessEntry>;

    /// Graceful interrupt (SIGINT on Unix).
    fn stop_process(&self, pid: u32) -> Result<(), CodexError>;

    /// Forceful termination (SIGTERM on Unix, `taskkill /F` on Windows).
    fn terminate_process(&self, pid: u32) -> Result<(), CodexError>;
}

/// `ProcessInspector` over `sysinfo` and native signals.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessInspector;

impl ProcessInspector for SystemProcessInspector {
    fn list_processes(&self) -> Vec<ProcessEntry> {
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cmd(UpdateKind::OnlyIfNotSet),
        );

        system
            .processes()
            .iter()
            .map(|(pid, process)| ProcessEntry {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().into_owned(),
                command_line: process
                    .cmd()
                    .iter()
                    .map(|arg| arg.to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(" "),
                defunct: matches!(process.status(), ProcessStatus::Zombie),
            })
            .collect()
    }

    fn stop_process(&self, pid: u32) -> Result<(), CodexError> {
        debug!(pid, "sending interrupt");
        send_stop(pid)
    }

    fn terminate_process(&self, pid: u32) -> Result<(), CodexError> {
        debug!(pid, "sending terminate");
        send_terminate(pid)
    }
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: nix::sys::signal::Signal) -> Result<(), CodexError> {
    use nix::unistd::Pid;

    let raw = i32::try_from(pid).map_err(|_| CodexError::Signal {
        pid,
        message: "pid out of range".into(),
    })?;
    nix::sys::signal::kill(Pid::from_raw(raw), signal).map_err(|errno| {
        warn!(pid, %errno, ?signal, "signal delivery failed");
        CodexError::Signal {
            pid,
            message: errno.to_string(),
        }
    })
}

#[cfg(unix)]
fn send_stop(pid: u32) -> Result<(), CodexError> {
    send_signal(pid, nix::sys::signal::Signal::SIGINT)
}

#[cfg(unix)]
fn send_terminate(pid: u32) -> Result<(), CodexError> {
    send_signal(pid, nix::sys::signal::Signal::SIGTERM)
}

#[cfg(windows)]
fn taskkill(pid: u32, force: bool) -> Result<(), CodexError> {
    let mut cmd = std::process::Command::new("taskkill");
    cmd.args(["/PID", &pid.to_string()]);
    if force {
        cmd.arg("/F");
    }
    let output = cmd.output().map_err(|e| CodexError::Signal {
        pid,
        message: format!("failed to run taskkill: {e}"),
    })?;
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    warn!(pid, %stderr, "taskkill failed");
    Err(CodexError::Signal {
        pid,
        message: stderr,
    })
}

#[cfg(windows)]
fn send_stop(pid: u32) -> Result<(), CodexError> {
    taskkill(pid, false)
}

#[cfg(windows)]
fn send_terminate(pid: u32) -> Result<(), CodexError> {
    taskkill(pid, true)
}
