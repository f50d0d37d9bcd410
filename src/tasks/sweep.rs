//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::Sweep;

/// Spawns a background task that periodically sweeps expired entries out of
/// every cache in `caches`.
///
/// Each sweep only takes a cache's write lock for the removal pass, so
/// request handlers are never blocked for longer than that.
///
/// # Returns
/// A JoinHandle for the spawned task, to be aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let sweep_handle = spawn_sweep_task(feed.sweepers(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(
    caches: Vec<(&'static str, Arc<dyn Sweep>)>,
    sweep_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting TTL sweep task with interval of {:?} over {} caches",
            sweep_interval,
            caches.len()
        );

        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            for (name, cache) in &caches {
                let removed = cache.sweep_expired();
                if removed > 0 {
                    info!(cache = *name, removed, "TTL sweep removed expired entries");
                } else {
                    debug!(cache = *name, "TTL sweep: no expired entries found");
                }
            }
        }
    })
}
