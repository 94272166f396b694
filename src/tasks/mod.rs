//! Background Tasks Module
//!
//! Best-effort cache maintenance. Nothing here ever fails the request or
//! lifecycle event that triggered it.
//!
//! # Tasks
//! - Eviction: FIFO trim of the current image store after each write
//! - Generations: removal of outdated image stores on activation

mod eviction;
mod generations;

pub use eviction::{evict_oldest, spawn_eviction, trim_image_cache, EvictionReport};
pub use generations::delete_stale_generations;
