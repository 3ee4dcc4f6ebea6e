//! Structured logging setup for the demo binary.

use tracing::Level;

/// Initialize the global `tracing` subscriber at `level`, formatted for a
/// terminal: no target module noise, no thread ids.
pub fn init_tracing(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}
