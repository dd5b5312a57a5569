//! Marketplace client setup wizard.

use tracing::warn;

use crate::context::AppContext;
use crate::error::PromptError;
use crate::marketplace::{
    get_or_create_eth_key, EthKey, DISCORD_BOT_CHANNEL_URL, DISCORD_SERVER_URL, ETH_FAUCET_URL,
    TST_FAUCET_URL,
};
use crate::ui::{choose, MenuOption};

pub const MSG_ENABLED: &str = "Marketplace client mode enabled.";
pub const MSG_ABORTED: &str = "Marketplace client setup aborted.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetupChoice {
    Proceed,
    Abort,
}

/// Provision the key, show funding instructions, and enable client mode when
/// the operator proceeds. Returns whether client mode was enabled.
pub async fn run_marketplace_setup(ctx: &mut AppContext) -> Result<bool, PromptError> {
    let key = match get_or_create_eth_key(&ctx.config, ctx.shell.as_ref()).await {
        Ok(key) => key,
        Err(err) => {
            warn!(%err, "eth key provisioning failed");
            ctx.ui
                .show_error(&format!("Failed to set up the Ethereum key: {err}"));
            return Ok(false);
        }
    };
    if let Some(address) = &key.address {
        ctx.session.set_eth_address(address.as_str());
    }
    ctx.ui.show_success(&account_text(&key));
    ctx.ui.show_info(&mint_instructions());

    let options = [
        MenuOption::new("Proceed", SetupChoice::Proceed),
        MenuOption::new("Abort", SetupChoice::Abort),
    ];
    if choose(ctx.ui.as_ref(), "Take your time.", &options)? == SetupChoice::Abort {
        ctx.ui.show_info(MSG_ABORTED);
        return Ok(false);
    }

    ctx.config.set_marketplace_client(true);
    if let Err(err) = ctx.config.save() {
        ctx.ui
            .show_error(&format!("Failed to save configuration: {err}"));
        return Ok(false);
    }
    ctx.ui.show_success(MSG_ENABLED);
    Ok(true)
}

fn account_text(key: &EthKey) -> String {
    let account = match &key.address {
        Some(address) => format!("'{address}'"),
        None => format!(
            "unknown (the key could not be read; check '{}')",
            key.private_key_path.display()
        ),
    };
    format!(
        "Your Codex node Ethereum account:\nPrivate key saved to '{}'\nEthereum Account: {account}",
        key.private_key_path.display()
    )
}

fn mint_instructions() -> String {
    format!(
        "Use one of these two methods to receive your testnet tokens:\n\n\
         Faucets:\n\
         Use the Eth faucet: '{ETH_FAUCET_URL}'\n\
         Then use the TST faucet: '{TST_FAUCET_URL}'\n\n\
         or\n\n\
         Discord bot:\n\
         Join the server: {DISCORD_SERVER_URL}\n\
         Go to the #BOT channel: {DISCORD_BOT_CHANNEL_URL}\n\
         Use '/set' and '/mint' commands to receive tokens.\n"
    )
}
