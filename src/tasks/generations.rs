//! Generation Cleanup Task
//!
//! Deletes image stores left behind by earlier versions of the worker.

use futures::future::join_all;
use tracing::{debug, error, info};

use crate::cache::{CacheStorage, StatsRecorder};
use crate::config::Config;

/// Deletes every store that carries the image-cache prefix but is not the
/// current generation. Stores outside the prefix are never touched.
///
/// Deletions run concurrently and the future resolves only once all of them
/// have settled. Failures are logged and swallowed. Returns the number of
/// stores deleted.
pub async fn delete_stale_generations(
    storage: &dyn CacheStorage,
    config: &Config,
    stats: &StatsRecorder,
) -> usize {
    let names = match storage.names().await {
        Ok(names) => names,
        Err(err) => {
            error!(error = %err, "failed to list cache stores");
            stats.record_maintenance_error();
            return 0;
        }
    };

    let stale: Vec<&String> = names
        .iter()
        .filter(|name| config.is_stale_generation(name))
        .collect();
    if stale.is_empty() {
        debug!("no outdated image cache generations");
        return 0;
    }

    let results = join_all(stale.iter().map(|name| storage.delete(name))).await;

    let mut deleted = 0;
    for (name, result) in stale.iter().zip(results) {
        match result {
            Ok(true) => {
                info!(cache = %name, "deleted outdated image cache");
                deleted += 1;
            }
            Ok(false) => {}
            Err(err) => {
                error!(cache = %name, error = %err, "failed to delete outdated image cache");
                stats.record_maintenance_error();
            }
        }
    }

    stats.record_generations_deleted(deleted);
    deleted
}
