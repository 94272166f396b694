//! Cache Storage Ports
//!
//! The named-cache facility the worker reads and writes through. The host
//! owns the data; the worker only holds handles.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::fetch::{FetchResponse, RequestKey};

/// A collection of named cache stores.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Opens the store called `name`, creating it if absent.
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheStore>>;

    /// Names of all stores, in creation order.
    async fn names(&self) -> Result<Vec<String>>;

    /// Deletes a whole store. Returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool>;
}

/// One named store of request → response entries.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the stored response for `key`, if any.
    async fn lookup(&self, key: &RequestKey) -> Result<Option<FetchResponse>>;

    /// Stores `response` under `key`, replacing any previous entry.
    async fn put(&self, key: RequestKey, response: FetchResponse) -> Result<()>;

    /// Removes the entry for `key`. Returns whether it existed.
    async fn delete(&self, key: &RequestKey) -> Result<bool>;

    /// All keys, oldest write first.
    async fn keys(&self) -> Result<Vec<RequestKey>>;
}
