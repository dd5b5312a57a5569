//! Upload, download and local dataset listing.

use std::path::PathBuf;

use tracing::warn;

use super::number_selector::format_bytes;
use crate::context::AppContext;
use crate::error::PromptError;
use crate::node_api::DataEntry;

pub const MSG_NOT_ENCRYPTED: &str =
    "Codex does not encrypt files. Anything uploaded will be available publicly on testnet.";
pub const MSG_FILE_NOT_FOUND: &str = "File not found";
pub const MSG_NO_DATA: &str = "Node contains no datasets.";

pub async fn perform_upload(ctx: &mut AppContext) -> Result<(), PromptError> {
    ctx.ui.show_info(MSG_NOT_ENCRYPTED);
    let raw = ctx.ui.ask_text("Enter the file path")?;
    let path = PathBuf::from(raw.trim());
    if !path.is_file() {
        ctx.ui.show_error(MSG_FILE_NOT_FOUND);
        return Ok(());
    }

    let mut spinner = ctx.ui.spinner("Uploading...");
    let result = ctx.node.upload(ctx.api_port(), &path).await;
    spinner.finish();
    match result {
        Ok(cid) => ctx
            .ui
            .show_success(&format!("Upload successful.\n CID: '{cid}'")),
        Err(err) => {
            warn!(%err, "upload failed");
            ctx.ui.show_error(&format!("Error during upload: {err}"));
        }
    }
    Ok(())
}

pub async fn perform_download(ctx: &mut AppContext) -> Result<(), PromptError> {
    let cid = ctx.ui.ask_text("Enter the CID")?;
    let cid = cid.trim();
    if cid.is_empty() {
        return Ok(());
    }

    let mut spinner = ctx.ui.spinner("Downloading...");
    let result = ctx.node.download(ctx.api_port(), cid, &ctx.download_dir).await;
    spinner.finish();
    match result {
        Ok(file) => ctx.ui.show_success(&format!(
            "Download successful.\n File: '{}'",
            file.display()
        )),
        Err(err) => {
            warn!(%err, cid, "download failed");
            ctx.ui.show_error(&format!("Error during download: {err}"));
        }
    }
    Ok(())
}

pub async fn show_local_data(ctx: &mut AppContext) -> Result<(), PromptError> {
    let mut spinner = ctx.ui.spinner("Fetching...");
    let result = ctx.node.list_data(ctx.api_port()).await;
    spinner.finish();
    match result {
        Ok(entries) if entries.is_empty() => ctx.ui.show_info(MSG_NO_DATA),
        Ok(entries) => {
            for entry in &entries {
                ctx.ui.show_info(&describe_entry(entry));
            }
        }
        Err(err) => {
            warn!(%err, "data listing failed");
            ctx.ui
                .show_error(&format!("Failed to fetch local data: {err}"));
        }
    }
    Ok(())
}

fn describe_entry(entry: &DataEntry) -> String {
    let manifest = &entry.manifest;
    format!(
        "CID: {}\nFilename: {}\nMimetype: {}\nSize: {}\nProtected: {}",
        entry.cid,
        manifest.filename.as_deref().unwrap_or("-"),
        manifest.mimetype.as_deref().unwrap_or("-"),
        format_bytes(manifest.dataset_size),
        if manifest.protected { "yes" } else { "no" }
    )
}
