//! Node process lifecycle: count, start detached, two-phase stop.
//!
//! Nothing about the node is tracked in memory. Every query re-lists OS
//! processes so a node killed externally is noticed on the next check.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::inspector::{ProcessEntry, ProcessInspector};
use crate::config::ConfigStore;
use crate::error::CodexError;
use crate::network::NetworkInfo;
use crate::platform::Platform;
use crate::shell::ShellRunner;

/// Fixed waits used in place of readiness or exit confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleIntervals {
    /// Wait after spawning, before returning to the menu.
    pub after_start: Duration,
    /// Wait after each stop/terminate signal.
    pub after_stop: Duration,
}

impl Default for SettleIntervals {
    fn default() -> Self {
        Self {
            after_start: Duration::from_secs(5),
            after_stop: Duration::from_secs(3),
        }
    }
}

impl SettleIntervals {
    /// No waiting at all; for tests.
    pub const ZERO: Self = Self {
        after_start: Duration::ZERO,
        after_stop: Duration::ZERO,
    };
}

/// How a `stop()` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The node exited after the interrupt.
    Interrupted { pid: u32 },
    /// The node ignored the interrupt and was terminated.
    Terminated { pid: u32 },
}

/// Keep only live processes of the managed binary.
///
/// Windows matches `codex.exe`; elsewhere `codex` with defunct entries dropped.
pub fn filter_codex_processes(processes: Vec<ProcessEntry>, platform: Platform) -> Vec<ProcessEntry> {
    let name = platform.executable_name();
    processes
        .into_iter()
        .filter(|p| p.name == name)
        .filter(|p| platform.is_windows() || !p.defunct)
        .collect()
}

pub struct ProcessControl {
    shell: Arc<dyn ShellRunner>,
    inspector: Arc<dyn ProcessInspector>,
    network: Arc<dyn NetworkInfo>,
    settle: SettleIntervals,
}

impl ProcessControl {
    pub fn new(
        shell: Arc<dyn ShellRunner>,
        inspector: Arc<dyn ProcessInspector>,
        network: Arc<dyn NetworkInfo>,
    ) -> Self {
        Self {
            shell,
            inspector,
            network,
            settle: SettleIntervals::default(),
        }
    }

    pub fn with_settle_intervals(mut self, settle: SettleIntervals) -> Self {
        self.settle = settle;
        self
    }

    /// Live managed-node processes, in OS listing order.
    pub fn codex_processes(&self, platform: Platform) -> Vec<ProcessEntry> {
        filter_codex_processes(self.inspector.list_processes(), platform)
    }

    pub fn get_running_count(&self, config: &ConfigStore) -> usize {
        self.codex_processes(config.platform()).len()
    }

    pub fn is_running(&self, config: &ConfigStore) -> bool {
        self.get_running_count(config) > 0
    }

    /// Interrupt the first node process, escalating to terminate if it stays.
    pub async fn stop(&self, config: &ConfigStore) -> Result<StopOutcome, CodexError> {
        let platform = config.platform();
        let Some(target) = self.codex_processes(platform).into_iter().next() else {
            return Err(CodexError::NoProcessFound);
        };
        let pid = target.pid;

        info!(pid, "stopping codex node");
        self.inspector.stop_process(pid)?;
        tokio::time::sleep(self.settle.after_stop).await;

        if !self.is_pid_alive(pid, platform) {
            return Ok(StopOutcome::Interrupted { pid });
        }

        warn!(pid, "codex node still running after interrupt; terminating");
        self.inspector.terminate_process(pid)?;
        tokio::time::sleep(self.settle.after_stop).await;
        Ok(StopOutcome::Terminated { pid })
    }

    /// Write the node config, spawn the node detached, then settle.
    pub async fn start(&self, config: &ConfigStore) -> Result<u32, CodexError> {
        let public_ip = self.network.public_ip().await?;
        let bootstrap_nodes = self.network.bootstrap_nodes().await?;
        let config_file = config.write_managed_config_file(&public_ip, &bootstrap_nodes)?;

        let args = launch_args(
            &config_file.display().to_string(),
            config.get().marketplace_client,
            self.network.eth_provider(),
        );
        debug!(?args, "launching codex node");

        let pid = self.shell.spawn_detached(
            &config.executable_path(),
            &config.get().codex_root,
            &args,
        )?;
        info!(pid, "codex node started");
        tokio::time::sleep(self.settle.after_start).await;
        Ok(pid)
    }

    fn is_pid_alive(&self, pid: u32, platform: Platform) -> bool {
        self.codex_processes(platform).iter().any(|p| p.pid == pid)
    }
}

/// Command-line arguments for the node binary.
///
/// Marketplace persistence cannot be configured through `config.toml`, so it
/// is appended as a subcommand with its own flags.
pub fn launch_args(config_file: &str, marketplace_client: bool, eth_provider: &str) -> Vec<String> {
    let mut args = vec![format!("--config-file={config_file}")];
    if marketplace_client {
        args.push("persistence".into());
        args.push(format!("--eth-provider={eth_provider}"));
        args.push("--eth-private-key=eth.key".into());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::testsupport::{
        entry, FakeInspector, FakeNetwork, FakeShell, InspectorCall, TestTempDir,
    };

    fn store(dir: &TestTempDir, platform: Platform) -> ConfigStore {
        ConfigStore::open(
            dir.child("cli/config.json"),
            Configuration::with_root(dir.child("codex")),
            platform,
        )
        .unwrap()
    }

    fn control(shell: &Arc<FakeShell>, inspector: &Arc<FakeInspector>) -> ProcessControl {
        ProcessControl::new(shell.clone(), inspector.clone(), Arc::new(FakeNetwork::default()))
            .with_settle_intervals(SettleIntervals::ZERO)
    }

    fn mixed_listing() -> Vec<ProcessEntry> {
        vec![
            entry(10, "a.exe", false),
            entry(11, "aaa", false),
            entry(12, "codex", false),
            entry(13, "codex.exe", false),
            entry(14, "notcodex", false),
            entry(15, "alsonotcodex.exe", false),
            entry(16, "codex", true),
        ]
    }

    #[test]
    fn filter_keeps_only_codex_exe_on_windows() {
        let kept = filter_codex_processes(mixed_listing(), Platform::Windows);
        assert_eq!(kept.iter().map(|p| p.pid).collect::<Vec<_>>(), vec![13]);
    }

    #[test]
    fn filter_keeps_only_live_codex_elsewhere() {
        for platform in [Platform::Linux, Platform::Darwin] {
            let kept = filter_codex_processes(mixed_listing(), platform);
            assert_eq!(kept.iter().map(|p| p.pid).collect::<Vec<_>>(), vec![12]);
        }
    }

    #[test]
    fn running_count_counts_filtered_processes() {
        let dir = TestTempDir::new("pc-count");
        let config = store(&dir, Platform::Linux);
        let inspector = Arc::new(FakeInspector::with_listings(vec![vec![
            entry(1, "codex", false),
            entry(2, "codex", false),
            entry(3, "codex", true),
            entry(4, "bash", false),
        ]]));
        let pc = control(&Arc::new(FakeShell::default()), &inspector);
        assert_eq!(pc.get_running_count(&config), 2);
        assert!(pc.is_running(&config));
    }

    #[tokio::test]
    async fn stop_without_process_fails_and_sends_nothing() {
        let dir = TestTempDir::new("pc-none");
        let config = store(&dir, Platform::Linux);
        let inspector = Arc::new(FakeInspector::with_listings(vec![vec![entry(
            1, "bash", false,
        )]]));
        let pc = control(&Arc::new(FakeShell::default()), &inspector);

        let err = pc.stop(&config).await.unwrap_err();
        assert!(matches!(err, CodexError::NoProcessFound), "got: {err:?}");
        assert!(inspector.calls().is_empty());
    }

    #[tokio::test]
    async fn stop_interrupts_first_process_without_escalation_when_it_exits() {
        let dir = TestTempDir::new("pc-graceful");
        let config = store(&dir, Platform::Linux);
        let inspector = Arc::new(FakeInspector::with_listings(vec![
            vec![entry(12345, "codex", false), entry(111, "codex", false)],
            vec![entry(111, "codex", false)],
        ]));
        let pc = control(&Arc::new(FakeShell::default()), &inspector);

        let outcome = pc.stop(&config).await.unwrap();
        assert_eq!(outcome, StopOutcome::Interrupted { pid: 12345 });
        assert_eq!(inspector.calls(), vec![InspectorCall::Stop(12345)]);
    }

    #[tokio::test]
    async fn stop_escalates_to_terminate_with_same_pid() {
        let dir = TestTempDir::new("pc-escalate");
        let config = store(&dir, Platform::Linux);
        let inspector = Arc::new(FakeInspector::with_listings(vec![
            vec![entry(42, "codex", false)],
            vec![entry(42, "codex", false)],
        ]));
        let pc = control(&Arc::new(FakeShell::default()), &inspector);

        let outcome = pc.stop(&config).await.unwrap();
        assert_eq!(outcome, StopOutcome::Terminated { pid: 42 });
        assert_eq!(
            inspector.calls(),
            vec![InspectorCall::Stop(42), InspectorCall::Terminate(42)]
        );
    }

    #[tokio::test]
    async fn stop_does_not_escalate_when_process_became_zombie() {
        let dir = TestTempDir::new("pc-zombie");
        let config = store(&dir, Platform::Linux);
        let inspector = Arc::new(FakeInspector::with_listings(vec![
            vec![entry(7, "codex", false)],
            vec![entry(7, "codex", true)],
        ]));
        let pc = control(&Arc::new(FakeShell::default()), &inspector);

        pc.stop(&config).await.unwrap();
        assert_eq!(inspector.calls(), vec![InspectorCall::Stop(7)]);
    }

    #[tokio::test]
    async fn start_writes_config_and_spawns_detached_in_root() {
        let dir = TestTempDir::new("pc-start");
        let config = store(&dir, Platform::Linux);
        let shell = Arc::new(FakeShell::default());
        let pc = control(&shell, &Arc::new(FakeInspector::default()));

        let pid = pc.start(&config).await.unwrap();
        assert_eq!(pid, FakeShell::SPAWNED_PID);

        let written = std::fs::read_to_string(config.generated_config_file_path()).unwrap();
        assert!(written.contains("nat=\"extip:1.2.3.4\"\n"));
        assert!(written.contains("bootstrap-node=[\"boot111\",\"boot222\"]\n"));

        let spawns = shell.spawns();
        assert_eq!(spawns.len(), 1);
        let (program, cwd, args) = &spawns[0];
        assert_eq!(program, &config.executable_path());
        assert_eq!(cwd, &dir.child("codex"));
        assert_eq!(
            args,
            &vec![format!(
                "--config-file={}",
                config.generated_config_file_path().display()
            )]
        );
    }

    #[tokio::test]
    async fn start_refuses_invalid_config_without_spawning() {
        let dir = TestTempDir::new("pc-start-invalid");
        let mut config = store(&dir, Platform::Linux);
        // Hand-edited file bypassing the guarded setter.
        dir.write_text(
            "cli/config.json",
            &format!(
                r#"{{"codexRoot":"{}","storageQuota":10,"ports":{{"discPort":8090,"listenPort":8070,"apiPort":8080}}}}"#,
                dir.child("codex").display().to_string().replace('\\', "/")
            ),
        );
        config.load().unwrap();

        let shell = Arc::new(FakeShell::default());
        let pc = control(&shell, &Arc::new(FakeInspector::default()));
        let err = pc.start(&config).await.unwrap_err();
        assert!(matches!(err, CodexError::Config(_)), "got: {err:?}");
        assert!(shell.spawns().is_empty());
    }

    #[test]
    fn marketplace_mode_appends_persistence_flags() {
        let args = launch_args("/r/config.toml", true, "https://rpc.example");
        assert_eq!(
            args,
            vec![
                "--config-file=/r/config.toml".to_string(),
                "persistence".to_string(),
                "--eth-provider=https://rpc.example".to_string(),
                "--eth-private-key=eth.key".to_string(),
            ]
        );
        assert_eq!(launch_args("/r/config.toml", false, "x").len(), 1);
    }
}
