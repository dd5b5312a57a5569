//! OS shell execution and detached process spawning.

use crate::error::ShellError;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs commands through the OS shell.
#[async_trait]
pub trait ShellRunner: Send + Sync {
    /// Run `command` and return its stdout; non-zero exit is an error.
    async fn run(&self, command: &str) -> Result<String, ShellError>;

    /// Spawn `program` detached from this process and return its PID.
    ///
    /// The child gets null stdio and is never awaited, so it keeps running
    /// after the CLI exits.
    fn spawn_detached(
        &self,
        program: &Path,
        working_dir: &Path,
        args: &[String],
    ) -> Result<u32, ShellError>;
}

/// `ShellRunner` backed by `sh -c` (or `cmd /C` on Windows).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShell;

#[async_trait]
impl ShellRunner for SystemShell {
    async fn run(&self, command: &str) -> Result<String, ShellError> {
        debug!(command, "running shell command");
        let output = run_process(shell_program(), &shell_args(command), command).await?;
        ensure_success(output, command).map(|out| out.stdout)
    }

    fn spawn_detached(
        &self,
        program: &Path,
        working_dir: &Path,
        args: &[String],
    ) -> Result<u32, ShellError> {
        let mut cmd = std::process::Command::new(program);
        cmd.args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        detach(&mut cmd);

        let child = cmd.spawn().map_err(|source| ShellError::Spawn {
            command: program.display().to_string(),
            source,
        })?;
        let pid = child.id();
        debug!(pid, program = %program.display(), "spawned detached process");
        // Dropping the handle neither waits on nor kills the child.
        drop(child);
        Ok(pid)
    }
}

#[cfg(unix)]
fn detach(cmd: &mut std::process::Command) {
    use std::os::unix::process::CommandExt;
    // New process group so terminal Ctrl-C is not delivered to the node.
    cmd.process_group(0);
}

#[cfg(windows)]
fn detach(cmd: &mut std::process::Command) {
    use std::os::windows::process::CommandExt;
    const DETACHED_PROCESS: u32 = 0x0000_0008;
    const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
    cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
}

fn shell_program() -> &'static str {
    if cfg!(windows) {
        "cmd"
    } else {
        "sh"
    }
}

fn shell_args(command: &str) -> Vec<String> {
    if cfg!(windows) {
        vec!["/C".into(), command.into()]
    } else {
        vec!["-c".into(), command.into()]
    }
}

/// Spawn and wait for a process, capturing both output streams.
async fn run_process(
    program: &str,
    args: &[String],
    display: &str,
) -> Result<ShellOutput, ShellError> {
    let mut cmd = Command::new(program);
    // A dropped future must not leave an installer script running.
    cmd.kill_on_drop(true);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let output = cmd.output().await.map_err(|source| ShellError::Spawn {
        command: display.to_string(),
        source,
    })?;

    Ok(ShellOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Convert a non-zero exit into `ShellError::NonZeroExit`.
fn ensure_success(output: ShellOutput, command: &str) -> Result<ShellOutput, ShellError> {
    if output.exit_code == 0 {
        return Ok(output);
    }
    Err(ShellError::NonZeroExit {
        command: command.to_string(),
        code: (output.exit_code >= 0).then_some(output.exit_code),
        stderr: output.stderr,
    })
}

/// Double-quote a path for interpolation into a shell command line.
pub fn quote_path(path: &Path) -> String {
    format!("\"{}\"", path.display())
}
