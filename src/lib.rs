//! Image Cache Worker - A cache-aside layer for image fetches
//!
//! Serves images from a named cache store, falls back to the network and
//! then to stale entries, bounds the store with FIFO eviction and removes
//! outdated cache generations on activation.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod tasks;
pub mod worker;


pub use api::AppState;
pub use config::Config;
pub use error::{Result, WorkerError};
pub use worker::{ImageCacheWorker, Served, ServedFrom};
