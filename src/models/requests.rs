//! Request DTOs for the gateway API
//!
//! Defines the query parameters accepted by the gateway.

use serde::Deserialize;

use crate::error::{Result, WorkerError};
use crate::fetch::{Destination, FetchRequest};

/// Query string for the fetch operation (GET /fetch)
///
/// # Fields
/// - `url`: Absolute http(s) URL the page asked for
/// - `destination`: Optional resource kind, e.g. `image` or `script`
#[derive(Debug, Clone, Deserialize)]
pub struct FetchQuery {
    pub url: String,
    #[serde(default)]
    pub destination: Option<String>,
}

impl FetchQuery {
    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.trim().is_empty() {
            return Some("url cannot be empty".to_string());
        }
        None
    }

    /// Builds the `GET` request this query describes.
    pub fn to_request(&self) -> Result<FetchRequest> {
        let request = FetchRequest::get(self.url.trim())?;
        if !matches!(request.url.scheme(), "http" | "https") {
            return Err(WorkerError::InvalidRequest(format!(
                "unsupported scheme: {}",
                request.url.scheme()
            )));
        }

        let destination = self
            .destination
            .as_deref()
            .map(Destination::parse)
            .unwrap_or_default();
        Ok(request.with_destination(destination))
    }
}
