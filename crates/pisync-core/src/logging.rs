//! Logging init: file under XDG state dir, or graceful fallback to stderr.

use anyhow::Result;
use std::fs;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Initialize structured logging to `~/.local/state/pisync/pisync.log`.
/// Falls back to stderr when the state dir cannot be created or opened.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pisync_core=debug"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false);

    match open_log_file() {
        Ok(file) => builder.with_writer(Mutex::new(file)).init(),
        Err(_) => builder.with_writer(std::io::stderr).init(),
    }
}

/// Open the log file (append) under the XDG state dir, creating it as needed.
fn open_log_file() -> Result<fs::File> {
    let state_dir = xdg::BaseDirectories::with_prefix("pisync")?.get_state_home();
    fs::create_dir_all(&state_dir)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(state_dir.join("pisync.log"))?;
    Ok(file)
}
