//! Sequential upload queue: FIFO jobs, a single drain loop, event fan-out.
//!
//! Callers may enqueue concurrently from any thread or task; jobs are
//! processed strictly in submission order with at most one transfer in flight
//! at any instant. A failed job never stops the queue. The queue is in-memory
//! only; anything still queued is lost when the process exits.

mod drain;
mod event;

pub use event::UploadEvent;

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::sync::broadcast;

use crate::client::{PiClient, UploadError};

/// Event channel capacity; a subscriber lagging further than this loses events.
const EVENT_CAPACITY: usize = 256;

/// One queued transfer: file path plus optional category tag.
#[derive(Debug, Clone)]
struct UploadJob {
    path: PathBuf,
    category: Option<String>,
}

/// Queue contents and the drain-loop flag; all mutation happens under one lock.
#[derive(Default)]
struct QueueState {
    jobs: VecDeque<UploadJob>,
    /// True iff a drain loop is running or about to start.
    draining: bool,
}

/// Sequential upload queue in front of a [`PiClient`].
///
/// The drain loop is started lazily on the first enqueue into an idle queue
/// and re-armed whenever work arrives while idle. Dropping the queue releases
/// the client once the active drain (if any) has finished its remaining jobs.
pub struct UploadQueue {
    client: Arc<PiClient>,
    state: Arc<Mutex<QueueState>>,
    events: broadcast::Sender<UploadEvent>,
    runtime: Handle,
}

impl UploadQueue {
    /// Create a queue bound to the given client.
    ///
    /// # Panics
    ///
    /// Panics outside a tokio runtime; the drain loop is spawned onto the
    /// runtime this was created on.
    pub fn new(client: PiClient) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            client: Arc::new(client),
            state: Arc::new(Mutex::new(QueueState::default())),
            events,
            runtime: Handle::current(),
        }
    }

    /// Subscribe to job lifecycle events. A receiver sees every event
    /// published after it subscribed, in publish order.
    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.events.subscribe()
    }

    /// The client this queue transfers through (usable for status probes).
    pub fn client(&self) -> &PiClient {
        &self.client
    }

    /// Append a job to the tail of the queue; never blocks on network I/O.
    ///
    /// An empty path is rejected synchronously and never enqueued. The append
    /// and the decision to start a drain loop happen under one lock, so
    /// concurrent enqueues can neither lose a job nor start a second loop.
    pub fn enqueue(
        &self,
        path: impl Into<PathBuf>,
        category: Option<&str>,
    ) -> Result<(), UploadError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(UploadError::EmptyPath);
        }
        let job = UploadJob {
            path,
            category: category.map(str::to_string),
        };

        let mut state = self.state.lock().unwrap();
        state.jobs.push_back(job);
        if !state.draining {
            state.draining = true;
            self.runtime.spawn(drain::run(
                Arc::clone(&self.client),
                Arc::clone(&self.state),
                self.events.clone(),
            ));
        }
        Ok(())
    }

    /// Number of jobs waiting in the queue (not counting one in flight).
    pub fn pending(&self) -> usize {
        self.state.lock().unwrap().jobs.len()
    }

    /// True when the queue is empty and no drain loop is active.
    pub fn is_idle(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.jobs.is_empty() && !state.draining
    }
}
