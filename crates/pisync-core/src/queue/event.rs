//! Job lifecycle events published by the upload queue.

use std::path::{Path, PathBuf};

use crate::client::ErrorKind;

/// Per-job event published by [`UploadQueue`](super::UploadQueue).
///
/// Every dequeued job produces a `Started` followed by exactly one of
/// `Completed` or `Failed`, in job processing order.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// The job was dequeued and its transfer is about to start.
    Started { path: PathBuf },
    /// The transfer succeeded; `response` is the raw response body.
    Completed { path: PathBuf, response: String },
    /// The transfer failed; the queue moves on to the next job.
    Failed {
        path: PathBuf,
        kind: ErrorKind,
        detail: String,
    },
}

impl UploadEvent {
    /// Path of the job this event refers to.
    pub fn path(&self) -> &Path {
        match self {
            UploadEvent::Started { path }
            | UploadEvent::Completed { path, .. }
            | UploadEvent::Failed { path, .. } => path,
        }
    }

    /// True for `Completed` and `Failed` (one per job, ends its lifecycle).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, UploadEvent::Started { .. })
    }
}
