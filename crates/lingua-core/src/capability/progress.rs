//! Download progress side channel.
//!
//! Providers that fetch resources on demand report progress here. The core
//! never depends on these reports.

/// Receives download progress while a session is getting ready.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, loaded: u64, total: u64);
}

/// Logs progress at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn on_progress(&self, loaded: u64, total: u64) {
        tracing::debug!("Downloaded {} of {} bytes.", loaded, total);
    }
}
