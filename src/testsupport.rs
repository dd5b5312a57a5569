//! Shared test fixtures: temp dirs and hand-written fakes for every seam.
//!
//! Fakes record what was asked of them so tests can assert on commands,
//! signals and prompts without touching the OS or the network.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::config::{ConfigStore, Configuration};
use crate::context::AppContext;
use crate::error::{ApiError, CodexError, PromptError, ShellError};
use crate::installer::{InstallProgress, Installer};
use crate::network::NetworkInfo;
use crate::node_api::{DataEntry, DebugInfo, LocalNode, NodeApi, NodeVersion, PeerNode, RoutingTable};
use crate::platform::Platform;
use crate::process::{ProcessControl, ProcessEntry, ProcessInspector, SettleIntervals};
use crate::session::Session;
use crate::shell::{quote_path, ShellRunner};
use crate::ui::{ProgressHandle, Ui};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("codexstorage-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

// ---------------------------------------------------------------------------
// Shell
// ---------------------------------------------------------------------------

type Hook = Box<dyn FnMut() + Send>;
type Spawn = (PathBuf, PathBuf, Vec<String>);

#[derive(Default)]
struct FakeShellState {
    responses: HashMap<String, Result<String, i32>>,
    hooks: HashMap<String, Hook>,
    commands: Vec<String>,
    spawns: Vec<Spawn>,
}

/// Scripted `ShellRunner`. Unscripted commands succeed with empty output;
/// `Err(code)` responses fail with that exit code.
#[derive(Default)]
pub struct FakeShell {
    state: Mutex<FakeShellState>,
}

impl FakeShell {
    pub const SPAWNED_PID: u32 = 4242;

    pub fn respond(&self, command: &str, response: Result<&str, i32>) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(command.to_string(), response.map(str::to_string));
    }

    /// Run `hook` whenever `command` is executed, before its response.
    pub fn on_run(&self, command: &str, hook: impl FnMut() + Send + 'static) {
        self.state
            .lock()
            .unwrap()
            .hooks
            .insert(command.to_string(), Box::new(hook));
    }

    pub fn commands(&self) -> Vec<String> {
        self.state.lock().unwrap().commands.clone()
    }

    pub fn spawns(&self) -> Vec<Spawn> {
        self.state.lock().unwrap().spawns.clone()
    }
}

#[async_trait]
impl ShellRunner for FakeShell {
    async fn run(&self, command: &str) -> Result<String, ShellError> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(command.to_string());
        if let Some(hook) = state.hooks.get_mut(command) {
            hook();
        }
        match state.responses.get(command) {
            Some(Ok(stdout)) => Ok(stdout.clone()),
            Some(Err(code)) => Err(ShellError::NonZeroExit {
                command: command.to_string(),
                code: Some(*code),
                stderr: String::new(),
            }),
            None => Ok(String::new()),
        }
    }

    fn spawn_detached(
        &self,
        program: &Path,
        working_dir: &Path,
        args: &[String],
    ) -> Result<u32, ShellError> {
        self.state.lock().unwrap().spawns.push((
            program.to_path_buf(),
            working_dir.to_path_buf(),
            args.to_vec(),
        ));
        Ok(Self::SPAWNED_PID)
    }
}

// ---------------------------------------------------------------------------
// Processes
// ---------------------------------------------------------------------------

pub fn entry(pid: u32, name: &str, defunct: bool) -> ProcessEntry {
    ProcessEntry {
        pid,
        name: name.to_string(),
        command_line: name.to_string(),
        defunct,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectorCall {
    Stop(u32),
    Terminate(u32),
}

#[derive(Default)]
struct FakeInspectorState {
    listings: VecDeque<Vec<ProcessEntry>>,
    calls: Vec<InspectorCall>,
}

/// Each `list_processes` call consumes the next scripted listing; the last
/// one repeats forever. No listings means an empty process table.
#[derive(Default)]
pub struct FakeInspector {
    state: Mutex<FakeInspectorState>,
}

impl FakeInspector {
    pub fn with_listings(listings: Vec<Vec<ProcessEntry>>) -> Self {
        let inspector = Self::default();
        inspector.set_listings(listings);
        inspector
    }

    pub fn set_listings(&self, listings: Vec<Vec<ProcessEntry>>) {
        self.state.lock().unwrap().listings = listings.into();
    }

    pub fn calls(&self) -> Vec<InspectorCall> {
        self.state.lock().unwrap().calls.clone()
    }
}

impl ProcessInspector for FakeInspector {
    fn list_processes(&self) -> Vec<ProcessEntry> {
        let mut state = self.state.lock().unwrap();
        if state.listings.len() > 1 {
            return state.listings.pop_front().unwrap_or_default();
        }
        state.listings.front().cloned().unwrap_or_default()
    }

    fn stop_process(&self, pid: u32) -> Result<(), CodexError> {
        self.state.lock().unwrap().calls.push(InspectorCall::Stop(pid));
        Ok(())
    }

    fn terminate_process(&self, pid: u32) -> Result<(), CodexError> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(InspectorCall::Terminate(pid));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Network and node API
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct FakeNetwork;

#[async_trait]
impl NetworkInfo for FakeNetwork {
    async fn public_ip(&self) -> Result<String, ApiError> {
        Ok("1.2.3.4".to_string())
    }

    async fn bootstrap_nodes(&self) -> Result<Vec<String>, ApiError> {
        Ok(vec!["boot111".to_string(), "boot222".to_string()])
    }

    fn eth_provider(&self) -> &str {
        "http://localhost:8545"
    }
}

/// `debug/info` payload with `peers` routing-table entries.
pub fn sample_debug_info(peers: usize) -> DebugInfo {
    DebugInfo {
        id: "16Uiu2".to_string(),
        spr: "spr:abc".to_string(),
        announce_addresses: vec!["/ip4/1.2.3.4/tcp/8070".to_string()],
        table: RoutingTable {
            local_node: LocalNode {
                node_id: "node-local".to_string(),
                peer_id: "peer-local".to_string(),
                address: "1.2.3.4:8090".to_string(),
            },
            nodes: (0..peers)
                .map(|i| PeerNode {
                    peer_id: format!("peer-{i}"),
                    address: format!("10.0.0.{i}:8090"),
                    seen: i % 2 == 0,
                })
                .collect(),
        },
        codex: NodeVersion {
            version: "v0.1.9".to_string(),
            revision: "abcd".to_string(),
        },
    }
}

#[derive(Default)]
struct FakeNodeState {
    debug_info: Option<DebugInfo>,
    data: Vec<DataEntry>,
    uploads: Vec<PathBuf>,
    downloads: Vec<(String, PathBuf)>,
}

/// In-memory node. `debug_info` fails until one is set.
#[derive(Default)]
pub struct FakeNodeApi {
    state: Mutex<FakeNodeState>,
}

impl FakeNodeApi {
    pub const UPLOAD_CID: &'static str = "zCidUpload";

    pub fn set_debug_info(&self, info: DebugInfo) {
        self.state.lock().unwrap().debug_info = Some(info);
    }

    pub fn set_data(&self, data: Vec<DataEntry>) {
        self.state.lock().unwrap().data = data;
    }

    pub fn uploads(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn downloads(&self) -> Vec<(String, PathBuf)> {
        self.state.lock().unwrap().downloads.clone()
    }
}

#[async_trait]
impl NodeApi for FakeNodeApi {
    async fn debug_info(&self, _api_port: u16) -> Result<DebugInfo, ApiError> {
        self.state
            .lock()
            .unwrap()
            .debug_info
            .clone()
            .ok_or_else(|| ApiError::Status(503, "node unavailable".to_string()))
    }

    async fn upload(&self, _api_port: u16, file: &Path) -> Result<String, ApiError> {
        self.state.lock().unwrap().uploads.push(file.to_path_buf());
        Ok(Self::UPLOAD_CID.to_string())
    }

    async fn download(
        &self,
        _api_port: u16,
        cid: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, ApiError> {
        self.state
            .lock()
            .unwrap()
            .downloads
            .push((cid.to_string(), dest_dir.to_path_buf()));
        Ok(dest_dir.join(cid))
    }

    async fn list_data(&self, _api_port: u16) -> Result<Vec<DataEntry>, ApiError> {
        Ok(self.state.lock().unwrap().data.clone())
    }
}

// ---------------------------------------------------------------------------
// Install progress and UI
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub events: Vec<String>,
}

impl InstallProgress for RecordingProgress {
    fn install_starts(&mut self) {
        self.events.push("install_starts".into());
    }

    fn download_successful(&mut self) {
        self.events.push("download_successful".into());
    }

    fn install_successful(&mut self) {
        self.events.push("install_successful".into());
    }

    fn warn(&mut self, message: &str) {
        self.events.push(format!("warn: {message}"));
    }
}

#[derive(Debug, Default)]
struct ScriptedUiState {
    inputs: VecDeque<String>,
    choice_prompts: Vec<Vec<String>>,
    text_prompts: Vec<String>,
    infos: Vec<String>,
    successes: Vec<String>,
    errors: Vec<String>,
    spinners: Vec<String>,
    logos: usize,
}

/// `Ui` fed from a fixed list of answers. Choices are given 1-based, as an
/// operator would type them. Running out of answers reads as closed stdin.
#[derive(Debug, Clone, Default)]
pub struct ScriptedUi {
    state: Arc<Mutex<ScriptedUiState>>,
}

impl ScriptedUi {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ui = Self::default();
        ui.state.lock().unwrap().inputs = inputs.into_iter().map(Into::into).collect();
        ui
    }

    fn next_input(&self) -> Option<String> {
        self.state.lock().unwrap().inputs.pop_front()
    }

    pub fn choice_prompts(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().choice_prompts.clone()
    }

    pub fn text_prompts(&self) -> Vec<String> {
        self.state.lock().unwrap().text_prompts.clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.state.lock().unwrap().infos.clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.state.lock().unwrap().successes.clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.state.lock().unwrap().errors.clone()
    }

    pub fn spinners(&self) -> Vec<String> {
        self.state.lock().unwrap().spinners.clone()
    }

    pub fn logo_count(&self) -> usize {
        self.state.lock().unwrap().logos
    }
}

impl Ui for ScriptedUi {
    fn show_logo(&self) {
        self.state.lock().unwrap().logos += 1;
    }

    fn show_info(&self, message: &str) {
        self.state.lock().unwrap().infos.push(message.to_string());
    }

    fn show_success(&self, message: &str) {
        self.state.lock().unwrap().successes.push(message.to_string());
    }

    fn show_error(&self, message: &str) {
        self.state.lock().unwrap().errors.push(message.to_string());
    }

    fn ask_choice(&self, _message: &str, labels: &[String]) -> Result<usize, PromptError> {
        self.state
            .lock()
            .unwrap()
            .choice_prompts
            .push(labels.to_vec());
        let raw = self.next_input().ok_or(PromptError::Closed)?;
        let choice = raw
            .trim()
            .parse::<usize>()
            .unwrap_or_else(|_| panic!("scripted choice `{raw}` is not a number"));
        assert!(
            (1..=labels.len()).contains(&choice),
            "scripted choice {choice} out of range for {labels:?}"
        );
        Ok(choice - 1)
    }

    fn ask_text(&self, prompt: &str) -> Result<String, PromptError> {
        self.state
            .lock()
            .unwrap()
            .text_prompts
            .push(prompt.to_string());
        self.next_input().ok_or(PromptError::Closed)
    }

    fn spinner(&self, label: &str) -> ProgressHandle {
        self.state.lock().unwrap().spinners.push(label.to_string());
        ProgressHandle::disabled()
    }
}

// ---------------------------------------------------------------------------
// AppContext
// ---------------------------------------------------------------------------

fn no_browser(_url: &str) -> bool {
    false
}

/// Fakes wired into an `AppContext` rooted at `<dir>/codex` on Linux, with
/// zero settle intervals.
pub struct TestContextBuilder {
    pub shell: Arc<FakeShell>,
    pub inspector: Arc<FakeInspector>,
    pub node: Arc<FakeNodeApi>,
    pub ui: ScriptedUi,
    config: ConfigStore,
    download_dir: PathBuf,
}

pub fn test_context(dir: &TestTempDir, ui: ScriptedUi) -> TestContextBuilder {
    let config = ConfigStore::open(
        dir.child("cli/config.json"),
        Configuration::with_root(dir.child("codex")),
        Platform::Linux,
    )
    .expect("config store");
    TestContextBuilder {
        shell: Arc::new(FakeShell::default()),
        inspector: Arc::new(FakeInspector::default()),
        node: Arc::new(FakeNodeApi::default()),
        ui,
        config,
        download_dir: dir.child("downloads"),
    }
}

impl TestContextBuilder {
    pub fn exe_path(&self) -> PathBuf {
        self.config.executable_path()
    }

    /// Put a binary in place and script its `--version` output.
    pub fn installed(self) -> Self {
        let exe = self.exe_path();
        if let Some(parent) = exe.parent() {
            fs::create_dir_all(parent).expect("create codex root");
        }
        fs::write(&exe, "").expect("write fake binary");
        self.shell
            .respond(&format!("{} --version", quote_path(&exe)), Ok("v0.1.9\n"));
        self
    }

    pub fn build(self) -> AppContext {
        fs::create_dir_all(&self.download_dir).expect("create download dir");
        let shell: Arc<dyn ShellRunner> = self.shell.clone();
        AppContext {
            installer: Installer::new(shell.clone(), self.download_dir.clone()),
            process: ProcessControl::new(
                shell.clone(),
                self.inspector.clone(),
                Arc::new(FakeNetwork),
            )
            .with_settle_intervals(SettleIntervals::ZERO),
            config: self.config,
            node: self.node.clone(),
            shell,
            ui: Arc::new(self.ui.clone()),
            session: Session::default(),
            download_dir: self.download_dir,
            open_url: no_browser,
        }
    }
}
