//! Cache Module
//!
//! Cache storage ports, the in-memory storage used by the gateway, and worker
//! statistics.

mod memory;
mod order;
mod stats;
mod storage;

// Re-export public types
pub use memory::{MemoryCacheStorage, MemoryCacheStore};
pub use order::InsertionOrder;
pub use stats::{CacheStats, StatsRecorder};
pub use storage::{CacheStorage, CacheStore};
