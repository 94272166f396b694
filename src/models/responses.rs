//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing JSON response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the activate operation (POST /activate)
#[derive(Debug, Clone, Serialize)]
pub struct ActivateResponse {
    /// Name of the generation that stays
    pub current_cache: String,
    /// Number of outdated stores removed
    pub deleted_stores: usize,
}

impl ActivateResponse {
    pub fn new(current_cache: impl Into<String>, deleted_stores: usize) -> Self {
        Self {
            current_cache: current_cache.into(),
            deleted_stores,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Name of the current store
    pub cache: String,
    /// Entries currently in the store
    pub entries: usize,
    /// Entry bound enforced by eviction
    pub max_entries: usize,
    /// Worker counters
    #[serde(flatten)]
    pub counters: CacheStats,
    /// Share of intercepted requests answered from cache
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from worker statistics
    pub fn new(
        cache: impl Into<String>,
        entries: usize,
        max_entries: usize,
        counters: CacheStats,
    ) -> Self {
        let hit_rate = counters.hit_rate();
        Self {
            cache: cache.into(),
            entries,
            max_entries,
            counters,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
