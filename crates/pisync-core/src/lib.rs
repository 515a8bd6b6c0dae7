pub mod config;
pub mod logging;

// Core modules: transfer client and the sequential upload queue.
pub mod client;
pub mod queue;
