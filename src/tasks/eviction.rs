//! FIFO Eviction Task
//!
//! Keeps the current image store within its entry bound by deleting the
//! oldest writes. Reads never refresh an entry's position.

use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::cache::{CacheStorage, CacheStore, StatsRecorder};
use crate::config::Config;
use crate::error::Result;

/// Outcome of one eviction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvictionReport {
    /// Entries deleted by this pass
    pub removed: usize,
    /// Entries whose deletion failed
    pub failed: usize,
}

/// Deletes the oldest entries of the current store until at most
/// `config.max_entries` remain.
///
/// Deletions run concurrently and independently; a failed deletion is logged
/// and counted without affecting the others. Errors opening or enumerating
/// the store are returned.
pub async fn evict_oldest(storage: &dyn CacheStorage, config: &Config) -> Result<EvictionReport> {
    let cache = storage.open(&config.current_cache_name()).await?;
    let keys = cache.keys().await?;

    if keys.len() <= config.max_entries {
        debug!(entries = keys.len(), "image cache within bound");
        return Ok(EvictionReport::default());
    }

    let excess = &keys[..keys.len() - config.max_entries];
    let results = join_all(excess.iter().map(|key| cache.delete(key))).await;

    let mut report = EvictionReport::default();
    for (key, result) in excess.iter().zip(results) {
        match result {
            Ok(true) => report.removed += 1,
            // Already gone, e.g. removed by an overlapping pass
            Ok(false) => {}
            Err(err) => {
                error!(%key, error = %err, "failed to evict image cache entry");
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

/// Runs one eviction pass, swallowing and logging every failure.
///
/// Returns the number of entries removed.
pub async fn trim_image_cache(
    storage: &dyn CacheStorage,
    config: &Config,
    stats: &StatsRecorder,
) -> usize {
    match evict_oldest(storage, config).await {
        Ok(report) => {
            stats.record_evictions(report.removed);
            for _ in 0..report.failed {
                stats.record_maintenance_error();
            }
            if report.removed > 0 {
                info!(removed = report.removed, "evicted oldest image cache entries");
            }
            report.removed
        }
        Err(err) => {
            error!(error = %err, "image cache eviction failed");
            stats.record_maintenance_error();
            0
        }
    }
}

/// Spawns a detached eviction pass.
///
/// The caller does not wait on the handle; dropping it leaves the task running.
pub fn spawn_eviction(
    storage: Arc<dyn CacheStorage>,
    config: Arc<Config>,
    stats: Arc<StatsRecorder>,
) -> JoinHandle<usize> {
    tokio::spawn(async move { trim_image_cache(storage.as_ref(), &config, &stats).await })
}
