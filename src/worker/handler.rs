//! Cache-Aside Fetch Handler
//!
//! Cache first, then network, then whatever the cache still holds if the
//! network is unreachable.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CacheStorage, CacheStore};
use crate::error::{Result, WorkerError};
use crate::fetch::{FetchRequest, FetchResponse, RequestKey};
use crate::tasks::spawn_eviction;
use crate::worker::{ImageCacheWorker, Served, ServedFrom};

impl ImageCacheWorker {
    /// Produces the response for an image request.
    ///
    /// Only a network failure with nothing cached to fall back on (or a store
    /// that cannot be opened) surfaces as an error.
    pub async fn respond(&self, request: &FetchRequest) -> Result<Served> {
        let cache = self
            .storage
            .open(&self.config.current_cache_name())
            .await?;
        let key = request.key();

        match self.cache_then_network(&cache, &key, request).await {
            Ok(served) => Ok(served),
            Err(err) => self.fall_back_to_cache(&cache, &key, err).await,
        }
    }

    async fn cache_then_network(
        &self,
        cache: &Arc<dyn CacheStore>,
        key: &RequestKey,
        request: &FetchRequest,
    ) -> Result<Served> {
        if let Some(cached) = cache.lookup(key).await? {
            debug!(%key, "image cache hit");
            self.stats.record_hit();
            return Ok(Served::new(cached, ServedFrom::Cache));
        }

        debug!(%key, "image cache miss");
        self.stats.record_miss();
        let response = self.network.fetch(request).await?;

        if response.is_ok() {
            self.store(cache, key, &response).await;
        } else {
            debug!(%key, status = %response.status(), "not caching unsuccessful response");
        }

        Ok(Served::new(response, ServedFrom::Network))
    }

    /// Writes a copy of `response` and schedules eviction.
    ///
    /// A failed write is logged and otherwise ignored.
    async fn store(&self, cache: &Arc<dyn CacheStore>, key: &RequestKey, response: &FetchResponse) {
        match cache.put(key.clone(), response.duplicate()).await {
            Ok(()) => {
                self.stats.record_write();
                spawn_eviction(
                    self.storage.clone(),
                    self.config.clone(),
                    self.stats.clone(),
                );
            }
            Err(err) => {
                warn!(%key, error = %err, "failed to cache image response");
            }
        }
    }

    async fn fall_back_to_cache(
        &self,
        cache: &Arc<dyn CacheStore>,
        key: &RequestKey,
        err: WorkerError,
    ) -> Result<Served> {
        warn!(%key, error = %err, "image fetch failed, trying cache");

        match cache.lookup(key).await {
            Ok(Some(cached)) => {
                self.stats.record_stale_hit();
                Ok(Served::new(cached, ServedFrom::StaleCache))
            }
            Ok(None) => {
                self.stats.record_failure();
                Err(err)
            }
            Err(lookup_err) => {
                warn!(%key, error = %lookup_err, "cache fallback lookup failed");
                self.stats.record_failure();
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::http::StatusCode;

    use super::*;
    use crate::cache::{MemoryCacheStorage, MemoryCacheStore};
    use crate::config::Config;
    use crate::fetch::{Destination, NetworkFetcher};

    // == Test Doubles ==
    /// Network that answers from a fixed table and counts calls.
    #[derive(Default)]
    struct StubNetwork {
        responses: Mutex<HashMap<String, Result<FetchResponse>>>,
        calls: AtomicUsize,
    }

    impl StubNetwork {
        fn respond(self, url: &str, result: Result<FetchResponse>) -> Self {
            self.responses.lock().unwrap().insert(url.to_string(), result);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NetworkFetcher for StubNetwork {
        async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .get(request.url.as_str())
                .cloned()
                .unwrap_or_else(|| Err(WorkerError::Network("connection refused".to_string())))
        }
    }

    /// Network that fails, but only after another writer cached the image.
    struct RacingNetwork {
        storage: Arc<MemoryCacheStorage>,
    }

    #[async_trait]
    impl NetworkFetcher for RacingNetwork {
        async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
            let cache = self.storage.open("image-cache-v1").await?;
            cache
                .put(request.key(), FetchResponse::new(StatusCode::OK, "from-peer"))
                .await?;
            Err(WorkerError::Network("timed out".to_string()))
        }
    }

    /// Storage whose store fails the first lookup, then behaves.
    struct FlakyLookupStorage {
        store: Arc<MemoryCacheStore>,
        failed_once: AtomicBool,
    }

    #[async_trait]
    impl CacheStorage for FlakyLookupStorage {
        async fn open(&self, _name: &str) -> Result<Arc<dyn CacheStore>> {
            let store: Arc<dyn CacheStore> = Arc::new(FlakyLookupStore {
                inner: self.store.clone(),
                failed_once: self.failed_once.swap(true, Ordering::SeqCst),
            });
            Ok(store)
        }

        async fn names(&self) -> Result<Vec<String>> {
            Ok(vec!["image-cache-v1".to_string()])
        }

        async fn delete(&self, _name: &str) -> Result<bool> {
            Ok(false)
        }
    }

    struct FlakyLookupStore {
        inner: Arc<MemoryCacheStore>,
        failed_once: bool,
    }

    #[async_trait]
    impl CacheStore for FlakyLookupStore {
        async fn lookup(&self, key: &RequestKey) -> Result<Option<FetchResponse>> {
            if !self.failed_once {
                return Err(WorkerError::Storage("store busy".to_string()));
            }
            self.inner.lookup(key).await
        }

        async fn put(&self, key: RequestKey, response: FetchResponse) -> Result<()> {
            self.inner.put(key, response).await
        }

        async fn delete(&self, key: &RequestKey) -> Result<bool> {
            self.inner.delete(key).await
        }

        async fn keys(&self) -> Result<Vec<RequestKey>> {
            self.inner.keys().await
        }
    }

    // == Helpers ==
    const LOGO: &str = "https://cdn.example.com/logo.png";

    fn ok(body: &'static str) -> FetchResponse {
        FetchResponse::new(StatusCode::OK, body)
    }

    fn setup(network: StubNetwork) -> (ImageCacheWorker, Arc<MemoryCacheStorage>, Arc<StubNetwork>) {
        setup_with(Config::default(), network)
    }

    fn setup_with(
        config: Config,
        network: StubNetwork,
    ) -> (ImageCacheWorker, Arc<MemoryCacheStorage>, Arc<StubNetwork>) {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(network);
        let worker = ImageCacheWorker::new(config, storage.clone(), network.clone());
        (worker, storage, network)
    }

    async fn cached(storage: &MemoryCacheStorage, url: &str) -> Option<FetchResponse> {
        let cache = storage.open("image-cache-v1").await.unwrap();
        let key = FetchRequest::get(url).unwrap().key();
        cache.lookup(&key).await.unwrap()
    }

    async fn serve(worker: &ImageCacheWorker, url: &str) -> Result<Served> {
        let request = FetchRequest::get(url).unwrap();
        worker.intercept(request).expect("image request").await
    }

    // == Tests ==
    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let (worker, storage, network) = setup(StubNetwork::default().respond(LOGO, Ok(ok("net"))));
        let cache = storage.open("image-cache-v1").await.unwrap();
        let key = FetchRequest::get(LOGO).unwrap().key();
        cache.put(key, ok("cached")).await.unwrap();

        let served = serve(&worker, LOGO).await.unwrap();

        assert_eq!(served.source, ServedFrom::Cache);
        assert_eq!(served.response.body().as_ref(), b"cached");
        assert_eq!(network.calls(), 0);
        assert_eq!(worker.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_miss_fetches_and_caches() {
        let (worker, storage, network) = setup(StubNetwork::default().respond(LOGO, Ok(ok("net"))));

        let served = serve(&worker, LOGO).await.unwrap();

        assert_eq!(served.source, ServedFrom::Network);
        assert_eq!(served.response.body().as_ref(), b"net");
        assert_eq!(network.calls(), 1);

        let stored = cached(&storage, LOGO).await.expect("response should be cached");
        assert_eq!(stored.body().as_ref(), b"net");
        assert_eq!(worker.stats().writes, 1);

        // Second request is served from cache
        let again = serve(&worker, LOGO).await.unwrap();
        assert_eq!(again.source, ServedFrom::Cache);
        assert_eq!(network.calls(), 1);
    }

    #[tokio::test]
    async fn test_unsuccessful_response_not_cached() {
        let not_found = FetchResponse::new(StatusCode::NOT_FOUND, "missing");
        let (worker, storage, _network) = setup(StubNetwork::default().respond(LOGO, Ok(not_found)));

        let served = serve(&worker, LOGO).await.unwrap();

        assert_eq!(served.source, ServedFrom::Network);
        assert_eq!(served.response.status(), StatusCode::NOT_FOUND);
        assert!(cached(&storage, LOGO).await.is_none());
        assert_eq!(worker.stats().writes, 0);
    }

    #[tokio::test]
    async fn test_network_failure_without_cache_propagates() {
        let (worker, storage, network) = setup(StubNetwork::default());

        let result = serve(&worker, LOGO).await;

        assert!(matches!(result, Err(WorkerError::Network(_))));
        assert_eq!(network.calls(), 1);
        assert!(cached(&storage, LOGO).await.is_none());
        assert_eq!(worker.stats().failures, 1);
    }

    #[tokio::test]
    async fn test_network_failure_falls_back_to_cache() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let network = Arc::new(RacingNetwork {
            storage: storage.clone(),
        });
        let worker = ImageCacheWorker::new(Config::default(), storage.clone(), network);

        let served = serve(&worker, LOGO).await.unwrap();

        assert_eq!(served.source, ServedFrom::StaleCache);
        assert_eq!(served.response.body().as_ref(), b"from-peer");
        assert_eq!(worker.stats().stale_hits, 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_takes_fallback_path() {
        let store = Arc::new(MemoryCacheStore::default());
        let key = FetchRequest::get(LOGO).unwrap().key();
        store.put(key, ok("cached")).await.unwrap();

        let storage = Arc::new(FlakyLookupStorage {
            store,
            failed_once: AtomicBool::new(false),
        });
        let network = Arc::new(StubNetwork::default());
        let worker = ImageCacheWorker::new(Config::default(), storage, network.clone());

        // First open hands out a store whose lookups fail
        let result = serve(&worker, LOGO).await;
        assert!(matches!(result, Err(WorkerError::Storage(_))));
        assert_eq!(network.calls(), 0);

        let served = serve(&worker, LOGO).await.unwrap();
        assert_eq!(served.source, ServedFrom::Cache);
    }

    #[tokio::test]
    async fn test_failed_cache_write_still_returns_response() {
        let partial = FetchResponse::new(StatusCode::PARTIAL_CONTENT, "part");
        let (worker, storage, _network) = setup(StubNetwork::default().respond(LOGO, Ok(partial)));

        let served = serve(&worker, LOGO).await.unwrap();

        assert_eq!(served.response.status(), StatusCode::PARTIAL_CONTENT);
        assert!(cached(&storage, LOGO).await.is_none());
        assert_eq!(worker.stats().writes, 0);
    }

    #[tokio::test]
    async fn test_non_image_request_not_intercepted() {
        let url = "https://app.example.com/api/feed";
        let (worker, _storage, network) = setup(StubNetwork::default().respond(url, Ok(ok("{}"))));

        assert!(worker.intercept(FetchRequest::get(url).unwrap()).is_none());
        assert_eq!(network.calls(), 0);
    }

    #[tokio::test]
    async fn test_image_destination_intercepted() {
        let url = "https://app.example.com/avatar/7";
        let (worker, storage, _network) = setup(StubNetwork::default().respond(url, Ok(ok("face"))));

        let request = FetchRequest::get(url)
            .unwrap()
            .with_destination(Destination::Image);
        let served = worker.intercept(request).expect("image request").await.unwrap();

        assert_eq!(served.source, ServedFrom::Network);
        assert!(cached(&storage, url).await.is_some());
    }

    #[tokio::test]
    async fn test_writes_trigger_fifo_eviction() {
        let mut network = StubNetwork::default();
        let urls: Vec<String> = (0..5)
            .map(|i| format!("https://cdn.example.com/{}.png", i))
            .collect();
        for url in &urls {
            network = network.respond(url, Ok(ok("img")));
        }
        let (worker, storage, _network) = setup_with(Config::default().with_max_entries(3), network);

        for url in &urls {
            serve(&worker, url).await.unwrap();
        }

        let cache = storage.open("image-cache-v1").await.unwrap();
        tokio::time::timeout(Duration::from_secs(2), async {
            while cache.keys().await.unwrap().len() > 3 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("eviction should bring the store back to its bound");

        let keys: Vec<String> = cache
            .keys()
            .await
            .unwrap()
            .iter()
            .map(|k| k.url().to_string())
            .collect();
        assert_eq!(keys, urls[2..].to_vec());
    }
}
