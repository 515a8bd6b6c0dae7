//! `pisync status` – query the endpoint status string.

use anyhow::{Context, Result};
use pisync_core::client::PiClient;

pub async fn run_status(client: PiClient) -> Result<()> {
    let status = tokio::task::spawn_blocking(move || client.status())
        .await
        .context("status task join")??;
    println!("{status}");
    Ok(())
}
