//! In-Memory Cache Storage
//!
//! A [`CacheStorage`] that keeps every store in process memory, with the same
//! observable rules as a browser cache: GET-only identities, write-ordered
//! keys, and no partial responses.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStorage, CacheStore, InsertionOrder};
use crate::error::{Result, WorkerError};
use crate::fetch::{FetchResponse, RequestKey};

// == Memory Cache Storage ==
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    stores: RwLock<StorageInner>,
}

#[derive(Debug, Default)]
struct StorageInner {
    by_name: HashMap<String, Arc<MemoryCacheStore>>,
    created: InsertionOrder<String>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheStore>> {
        if let Some(store) = self.stores.read().await.by_name.get(name) {
            let store: Arc<dyn CacheStore> = store.clone();
            return Ok(store);
        }

        let mut stores = self.stores.write().await;
        // Another opener may have created it between the two locks
        if let Some(store) = stores.by_name.get(name) {
            let store: Arc<dyn CacheStore> = store.clone();
            return Ok(store);
        }

        debug!(cache = name, "creating cache store");
        let store = Arc::new(MemoryCacheStore::default());
        stores.by_name.insert(name.to_string(), store.clone());
        stores.created.push(name.to_string());

        let store: Arc<dyn CacheStore> = store;
        Ok(store)
    }

    async fn names(&self) -> Result<Vec<String>> {
        Ok(self.stores.read().await.created.iter().cloned().collect())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let mut stores = self.stores.write().await;
        stores.created.remove(&name.to_string());
        Ok(stores.by_name.remove(name).is_some())
    }
}

// == Memory Cache Store ==
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    entries: HashMap<RequestKey, FetchResponse>,
    order: InsertionOrder<RequestKey>,
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn lookup(&self, key: &RequestKey) -> Result<Option<FetchResponse>> {
        if !key.is_cacheable() {
            return Ok(None);
        }
        Ok(self.inner.read().await.entries.get(key).cloned())
    }

    async fn put(&self, key: RequestKey, response: FetchResponse) -> Result<()> {
        if !key.is_cacheable() {
            return Err(WorkerError::InvalidRequest(format!(
                "{} requests cannot be cached",
                key.method()
            )));
        }
        if response.status() == StatusCode::PARTIAL_CONTENT {
            return Err(WorkerError::InvalidRequest(
                "partial responses cannot be cached".to_string(),
            ));
        }

        let mut inner = self.inner.write().await;
        inner.entries.insert(key.clone(), response);
        inner.order.push(key);
        Ok(())
    }

    async fn delete(&self, key: &RequestKey) -> Result<bool> {
        let mut inner = self.inner.write().await;
        inner.order.remove(key);
        Ok(inner.entries.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<RequestKey>> {
        Ok(self.inner.read().await.order.iter().cloned().collect())
    }
}
