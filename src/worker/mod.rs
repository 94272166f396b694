//! Image Cache Worker
//!
//! Receives the host's `fetch` and `activate` events and routes them to the
//! cache-aside handler and the maintenance tasks.

mod classifier;
mod handler;

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tracing::trace;

use crate::cache::{CacheStats, CacheStorage, StatsRecorder};
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{FetchRequest, FetchResponse, NetworkFetcher};
use crate::tasks::delete_stale_generations;

pub use classifier::is_image_request;

// == Served Response ==
/// Where an intercepted response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    /// Found in the cache, no network call made
    Cache,
    /// Fetched from the network
    Network,
    /// Found in the cache after the network failed
    StaleCache,
}

impl ServedFrom {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServedFrom::Cache => "hit",
            ServedFrom::Network => "miss",
            ServedFrom::StaleCache => "stale",
        }
    }
}

/// Response produced for an intercepted request.
#[derive(Debug, Clone)]
pub struct Served {
    pub response: FetchResponse,
    pub source: ServedFrom,
}

impl Served {
    pub fn new(response: FetchResponse, source: ServedFrom) -> Self {
        Self { response, source }
    }
}

// == Worker ==
/// The image cache worker.
///
/// Cheap to clone; every clone shares the same configuration, storage,
/// network and counters.
#[derive(Clone)]
pub struct ImageCacheWorker {
    config: Arc<Config>,
    storage: Arc<dyn CacheStorage>,
    network: Arc<dyn NetworkFetcher>,
    stats: Arc<StatsRecorder>,
}

impl ImageCacheWorker {
    pub fn new(
        config: Config,
        storage: Arc<dyn CacheStorage>,
        network: Arc<dyn NetworkFetcher>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            network,
            stats: Arc::new(StatsRecorder::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn CacheStorage> {
        &self.storage
    }

    pub fn network(&self) -> &Arc<dyn NetworkFetcher> {
        &self.network
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // == Fetch Event ==
    /// Handles a fetch event.
    ///
    /// Returns `None` when the request is not an image, in which case the host
    /// handles it as if no worker were installed. Otherwise returns the future
    /// that produces the response.
    pub fn intercept(&self, request: FetchRequest) -> Option<BoxFuture<'static, Result<Served>>> {
        if !is_image_request(&request, &self.config) {
            trace!(url = %request.url, "not an image request, passing through");
            return None;
        }

        let worker = self.clone();
        Some(async move { worker.respond(&request).await }.boxed())
    }

    // == Activate Event ==
    /// Handles an activate event.
    ///
    /// Resolves once every outdated cache generation has been deleted (or
    /// failed to delete). Returns how many stores were removed.
    pub async fn activate(&self) -> usize {
        delete_stale_generations(self.storage.as_ref(), &self.config, &self.stats).await
    }
}
