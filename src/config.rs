//! Configuration Module
//!
//! Compiled-in settings for the image cache worker.

/// Prefix shared by every generation of the image cache.
pub const IMAGE_CACHE_PREFIX: &str = "image-cache-";

/// Version tag of the current cache generation.
pub const IMAGE_CACHE_VERSION: &str = "v1";

/// Maximum number of images kept in the current store.
pub const MAX_IMAGE_CACHE_SIZE: usize = 50;

/// Path extensions treated as images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "ico"];

/// Host substrings of object-storage endpoints that serve images.
pub const IMAGE_HOST_MARKERS: &[&str] = &["backblazeb2.com", "b2-api.com"];

/// Worker configuration.
///
/// Built once at startup and shared behind an `Arc`; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix identifying stores owned by this worker
    pub cache_prefix: String,
    /// Version appended to the prefix to name the current store
    pub cache_version: String,
    /// Maximum number of entries the current store may hold after eviction
    pub max_entries: usize,
    /// Lower-case file extensions that mark a request as an image
    pub image_extensions: Vec<String>,
    /// Host substrings that mark a request as an image
    pub image_host_markers: Vec<String>,
}

impl Config {
    /// Returns a copy of this config tagged with another generation version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.cache_version = version.into();
        self
    }

    /// Returns a copy of this config with a different entry bound.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Name of the store for the current generation, e.g. `image-cache-v1`.
    pub fn current_cache_name(&self) -> String {
        format!("{}{}", self.cache_prefix, self.cache_version)
    }

    /// Returns true for stores from an older (or newer) generation of this worker.
    pub fn is_stale_generation(&self, cache_name: &str) -> bool {
        cache_name.starts_with(&self.cache_prefix) && cache_name != self.current_cache_name()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_prefix: IMAGE_CACHE_PREFIX.to_string(),
            cache_version: IMAGE_CACHE_VERSION.to_string(),
            max_entries: MAX_IMAGE_CACHE_SIZE,
            image_extensions: IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            image_host_markers: IMAGE_HOST_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
