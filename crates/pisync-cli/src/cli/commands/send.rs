//! `pisync send <FILES>...` – queue files for upload and report per-file results.

use anyhow::Result;
use pisync_core::client::PiClient;
use pisync_core::queue::{UploadEvent, UploadQueue};
use std::path::PathBuf;
use tokio::sync::broadcast::error::RecvError;

pub async fn run_send(client: PiClient, files: Vec<PathBuf>, category: Option<&str>) -> Result<()> {
    let queue = UploadQueue::new(client);
    let mut events = queue.subscribe();

    let queued = files.len();
    for file in files {
        queue.enqueue(file, category)?;
    }

    let mut finished = 0usize;
    let mut failures = 0usize;
    while finished < queued {
        match events.recv().await {
            Ok(UploadEvent::Started { path }) => {
                println!("uploading {}", path.display());
            }
            Ok(UploadEvent::Completed { path, response }) => {
                finished += 1;
                if response.is_empty() {
                    println!("done: {}", path.display());
                } else {
                    println!("done: {} ({})", path.display(), response);
                }
            }
            Ok(UploadEvent::Failed { path, kind, detail }) => {
                finished += 1;
                failures += 1;
                eprintln!("failed ({}): {}: {}", kind, path.display(), detail);
            }
            Err(RecvError::Lagged(n)) => {
                tracing::warn!("event subscriber lagged, {n} events dropped");
            }
            Err(RecvError::Closed) => anyhow::bail!("upload queue closed unexpectedly"),
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {queued} uploads failed");
    }
    println!("{queued} file(s) uploaded");
    Ok(())
}
