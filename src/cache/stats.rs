//! Cache Statistics Module
//!
//! Tracks what the worker did with intercepted requests and maintenance runs.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time copy of the worker counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Requests answered straight from the cache
    pub hits: u64,
    /// Requests that missed the cache and went to the network
    pub misses: u64,
    /// Requests answered from the cache after the network failed
    pub stale_hits: u64,
    /// Network failures surfaced to the caller
    pub failures: u64,
    /// Responses written to the cache
    pub writes: u64,
    /// Entries removed by FIFO eviction
    pub evictions: u64,
    /// Swallowed errors from eviction or generation cleanup
    pub maintenance_errors: u64,
    /// Outdated cache generations deleted on activation
    pub generations_deleted: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate over intercepted requests.
    ///
    /// Stale hits count as hits. Returns 0.0 if nothing was intercepted.
    pub fn hit_rate(&self) -> f64 {
        let served = self.hits + self.stale_hits;
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            served as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by concurrent fetch handlers and background tasks.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    stale_hits: AtomicU64,
    failures: AtomicU64,
    writes: AtomicU64,
    evictions: AtomicU64,
    maintenance_errors: AtomicU64,
    generations_deleted: AtomicU64,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_hit(&self) {
        self.stale_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_evictions(&self, count: usize) {
        self.evictions.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_maintenance_error(&self) {
        self.maintenance_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generations_deleted(&self, count: usize) {
        self.generations_deleted
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    // == Snapshot ==
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stale_hits: self.stale_hits.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            maintenance_errors: self.maintenance_errors.load(Ordering::Relaxed),
            generations_deleted: self.generations_deleted.load(Ordering::Relaxed),
        }
    }
}
