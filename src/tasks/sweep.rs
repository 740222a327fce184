//! Expiry Sweep Task
//!
//! Background task that periodically removes expired entries from every
//! active cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info};

// == Sweepable ==
/// A cache that can drop its expired entries on demand.
#[async_trait]
pub trait Sweepable: Send + Sync {
    /// Removes expired entries, returning how many were dropped.
    async fn sweep_expired(&self) -> usize;

    /// Short name used in sweep logging.
    fn name(&self) -> &'static str;
}

/// Spawns a background task that periodically sweeps every target.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Sweeping cannot fail; a target left unswept simply
/// keeps its stale entries until the next pass or a lazy-expiry read.
///
/// # Arguments
/// * `targets` - Caches to sweep each pass
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let students = Arc::new(StudentCache::new());
/// let sweep_handle = spawn_sweep_task(vec![students.clone()], 300);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(
    targets: Vec<Arc<dyn Sweepable>>,
    sweep_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task over {} caches with interval of {} seconds",
            targets.len(),
            sweep_interval_secs
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            let mut total = 0;
            for target in &targets {
                let removed = target.sweep_expired().await;
                if removed > 0 {
                    debug!("Sweep dropped {} expired entries from {}", removed, target.name());
                }
                total += removed;
            }

            // Log sweep statistics
            if total > 0 {
                info!("Expiry sweep: removed {} expired entries", total);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
