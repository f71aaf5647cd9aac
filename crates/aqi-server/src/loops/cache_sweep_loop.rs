//! Periodic cache sweep.
//!
//! Reads already treat expired entries as absent; the sweep reclaims memory
//! for keys that are never read again and enforces the capacity bound.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::interval;

use crate::cache::MemoryCache;

/// Start the cache sweep loop.
pub async fn run_cache_sweep_loop(
    cache: Arc<MemoryCache>,
    every: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = interval(every.max(Duration::from_secs(1)));

    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Cache sweep loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                let removed = cache.sweep();
                if removed > 0 {
                    tracing::debug!("Cache sweep removed {} entries, {} remain", removed, cache.len());
                }
            }
        }
    }
}
