//! Request Classifier
//!
//! Decides which requests the image cache intercepts.

use crate::config::Config;
use crate::fetch::{Destination, FetchRequest};

/// Returns true when `request` should be served through the image cache.
///
/// A request qualifies if any of these hold:
/// - it declares an `image` destination
/// - its path ends in a configured image extension (any case)
/// - its host contains a configured object-storage marker
pub fn is_image_request(request: &FetchRequest, config: &Config) -> bool {
    request.destination == Destination::Image
        || has_image_extension(request.url.path(), &config.image_extensions)
        || is_image_host(request.url.host_str(), &config.image_host_markers)
}

fn has_image_extension(path: &str, extensions: &[String]) -> bool {
    match path.rsplit_once('.') {
        Some((_, ext)) => extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

fn is_image_host(host: Option<&str>, markers: &[String]) -> bool {
    host.map_or(false, |host| {
        markers.iter().any(|marker| host.contains(marker.as_str()))
    })
}
