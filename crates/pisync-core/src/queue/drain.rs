//! The drain loop: one worker processing queued jobs to queue-empty.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::client::{ErrorKind, PiClient};

use super::event::UploadEvent;
use super::{QueueState, UploadJob};

/// Processes jobs until the queue is empty, then clears the draining flag and
/// exits. The queue lock is held only to pop a job or to decide to stop, never
/// across a transfer, so enqueue stays O(1) while an upload is in flight.
pub(super) async fn run(
    client: Arc<PiClient>,
    state: Arc<Mutex<QueueState>>,
    events: broadcast::Sender<UploadEvent>,
) {
    loop {
        let job = {
            let mut state = state.lock().unwrap();
            match state.jobs.pop_front() {
                Some(job) => job,
                None => {
                    state.draining = false;
                    return;
                }
            }
        };
        process(&client, &events, job).await;
    }
}

/// Transfers one job and publishes its events. Per-job errors become `Failed`
/// events and never abort the loop.
async fn process(client: &Arc<PiClient>, events: &broadcast::Sender<UploadEvent>, job: UploadJob) {
    let UploadJob { path, category } = job;
    let _ = events.send(UploadEvent::Started { path: path.clone() });

    let client = Arc::clone(client);
    let transfer_path = path.clone();
    let result =
        tokio::task::spawn_blocking(move || client.upload(&transfer_path, category.as_deref()))
            .await;

    let event = match result {
        Ok(Ok(response)) => {
            tracing::debug!(path = %path.display(), "upload completed");
            UploadEvent::Completed { path, response }
        }
        Ok(Err(err)) => {
            tracing::warn!(path = %path.display(), error = %err, "upload failed");
            UploadEvent::Failed {
                path,
                kind: err.kind(),
                detail: err.to_string(),
            }
        }
        Err(join_err) => {
            // A panicking transfer task is a bug; report it like a failure so
            // observers still see one terminal event for the job.
            tracing::error!(path = %path.display(), error = %join_err, "upload task died");
            UploadEvent::Failed {
                path,
                kind: ErrorKind::Transport,
                detail: join_err.to_string(),
            }
        }
    };
    let _ = events.send(event);
}
