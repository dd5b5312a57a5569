//! Node status: connectivity summary, peer list and node details.

use async_trait::async_trait;
use tracing::warn;

use super::menu_loop::{LoopControl, MenuLoop, MenuPrompt};
use crate::context::AppContext;
use crate::error::PromptError;
use crate::node_api::DebugInfo;
use crate::ui::{choose, MenuOption, Ui};

pub const MSG_ONLINE: &str = "Node is ONLINE & DISCOVERABLE";
pub const MSG_FEW_PEERS: &str = "Node is ONLINE but has few peers";
pub const MSG_FETCH_FAILED: &str = "Failed to fetch debug/info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusAction {
    Peers,
    NodeInfo,
    Back,
}

struct StatusPrompt<'a> {
    ui: &'a dyn Ui,
    info: DebugInfo,
}

pub async fn show_node_status(ctx: &mut AppContext) -> Result<(), PromptError> {
    let mut spinner = ctx.ui.spinner("Fetching...");
    let fetched = ctx.node.debug_info(ctx.api_port()).await;
    spinner.finish();

    let info = match fetched {
        Ok(info) => info,
        Err(err) => {
            warn!(%err, "debug/info request failed");
            ctx.ui.show_error(MSG_FETCH_FAILED);
            return Ok(());
        }
    };

    if info.is_well_connected() {
        ctx.ui.show_success(MSG_ONLINE);
    } else {
        ctx.ui.show_info(MSG_FEW_PEERS);
    }

    MenuLoop::new(StatusPrompt {
        ui: ctx.ui.as_ref(),
        info,
    })
    .show_loop()
    .await
}

#[async_trait]
impl MenuPrompt for StatusPrompt<'_> {
    async fn prompt(&mut self, control: &mut LoopControl) -> Result<(), PromptError> {
        let options = [
            MenuOption::new("View connected peers", StatusAction::Peers),
            MenuOption::new("View node information", StatusAction::NodeInfo),
            MenuOption::new("Back to Main Menu", StatusAction::Back),
        ];
        match choose(self.ui, "Select information to view:", &options)? {
            StatusAction::Peers => self.show_peers(),
            StatusAction::NodeInfo => self.ui.show_info(&node_info_text(&self.info)),
            StatusAction::Back => control.stop_loop(),
        }
        Ok(())
    }
}

impl StatusPrompt<'_> {
    fn show_peers(&self) {
        if self.info.table.nodes.is_empty() {
            self.ui.show_info("No connected peers found.");
            return;
        }
        self.ui.show_info("Connected Peers");
        for (index, node) in self.info.table.nodes.iter().enumerate() {
            self.ui.show_info(&format!(
                "Peer {}:\nPeer ID: {}\nAddress: {}\nStatus: {}",
                index + 1,
                node.peer_id,
                node.address,
                if node.seen { "Active" } else { "Inactive" }
            ));
        }
    }
}

fn node_info_text(info: &DebugInfo) -> String {
    let (ip, port) = info.announced_ip_and_port().unwrap_or(("unknown", "unknown"));
    let local = &info.table.local_node;
    format!(
        "Version: {}\nRevision: {}\n\nNode ID: {}\nPeer ID: {}\nListening Address: {}\n\n\
         Public IP: {ip}\nPort: {port}\nConnected Peers: {}",
        info.codex.version,
        info.codex.revision,
        local.node_id,
        local.peer_id,
        local.address,
        info.peer_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_api::PeerNode;
    use crate::testsupport::{sample_debug_info, test_context, ScriptedUi, TestTempDir};

    #[tokio::test]
    async fn fetch_failure_shows_error_and_returns() {
        let dir = TestTempDir::new("status-fail");
        let ui = ScriptedUi::new(Vec::<&str>::new());
        let mut ctx = test_context(&dir, ui.clone()).build();

        show_node_status(&mut ctx).await.unwrap();

        assert_eq!(ui.errors(), vec![MSG_FETCH_FAILED]);
        assert!(ui.choice_prompts().is_empty());
    }

    #[tokio::test]
    async fn well_connected_node_reports_online() {
        let dir = TestTempDir::new("status-online");
        let ui = ScriptedUi::new(["1", "3"]);
        let builder = test_context(&dir, ui.clone());
        builder.node.set_debug_info(sample_debug_info(3));
        let mut ctx = builder.build();

        show_node_status(&mut ctx).await.unwrap();

        assert_eq!(ui.successes(), vec![MSG_ONLINE]);
        let infos = ui.infos();
        assert_eq!(infos[0], "Connected Peers");
        assert!(infos[1].starts_with("Peer 1:\nPeer ID: peer-0"));
        assert_eq!(infos.len(), 4);
    }

    #[tokio::test]
    async fn few_peers_is_reported_as_info() {
        let dir = TestTempDir::new("status-few");
        let ui = ScriptedUi::new(["1", "3"]);
        let builder = test_context(&dir, ui.clone());
        builder.node.set_debug_info(sample_debug_info(0));
        let mut ctx = builder.build();

        show_node_status(&mut ctx).await.unwrap();

        assert_eq!(
            ui.infos(),
            vec![MSG_FEW_PEERS, "No connected peers found."]
        );
    }

    #[test]
    fn node_info_lists_announced_address() {
        let mut info = sample_debug_info(1);
        info.table.nodes.push(PeerNode::default());
        let text = node_info_text(&info);
        assert!(text.contains("Public IP: 1.2.3.4\nPort: 8070"));
        assert!(text.ends_with("Connected Peers: 2"));
    }
}
