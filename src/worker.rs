use crate::backend::LockBackend;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Duration;

/// Ticker loop sampling how many leases are currently live.
pub fn spawn_usage_sampler(backend: Arc<dyn LockBackend>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match backend.active_count().await {
                Ok(count) => log::debug!("[SAMPLE] {} active leases", count),
                Err(e) => log::error!("[SAMPLE] Failed sampling lease usage: {:#}", e),
            }
        }
    })
}

/// Ticker loop sweeping expired leases out of the backend.
pub fn spawn_expiry_sweeper(backend: Arc<dyn LockBackend>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if let Err(e) = backend.cleanup_expired().await {
                log::error!("[SWEEP] Failed to clean up expired leases: {:#}", e);
            }
        }
    })
}
