//! CLI entry point for codexstorage.

mod app;
mod cli;

use clap::Parser;
use codexstorage::error::PromptError;
use codexstorage::headless::run_headless;
use codexstorage::menu::show_main_menu;
use tracing::{debug, info};

use app::startup::{build_context, init_tracing, spawn_ctrl_c_handler};

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    init_tracing();
    info!("{}", codexstorage::build_info::startup_metadata_line());

    let mut ctx = match build_context(args.config.clone(), !args.no_color) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    spawn_ctrl_c_handler(ctx.ui.clone());

    if let Some(command) = args.headless_command() {
        debug!(?command, "running headless");
        let code = run_headless(&mut ctx, command).await;
        std::process::exit(code);
    }

    match show_main_menu(&mut ctx).await {
        Ok(()) => {}
        // Input closed (EOF); leave quietly.
        Err(PromptError::Closed) => {}
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
