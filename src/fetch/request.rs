//! Intercepted Requests
//!
//! The request a fetch event carries, and the identity it is cached under.

use std::fmt;

use axum::http::Method;
use url::Url;

use crate::error::Result;

// == Destination ==
/// What kind of resource the caller declared it is loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    /// No destination declared (plain `fetch()` calls)
    #[default]
    Empty,
    Image,
    Document,
    Script,
    Style,
    Font,
    Media,
    /// Any destination this worker has no use for
    Other,
}

impl Destination {
    /// Parses a destination token such as `image` or `script`.
    ///
    /// Unknown tokens map to [`Destination::Other`]; an empty token maps to
    /// [`Destination::Empty`].
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "" => Destination::Empty,
            "image" => Destination::Image,
            "document" => Destination::Document,
            "script" => Destination::Script,
            "style" => Destination::Style,
            "font" => Destination::Font,
            "audio" | "video" | "track" => Destination::Media,
            _ => Destination::Other,
        }
    }
}

// == Fetch Request ==
/// A request delivered with a fetch event.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub url: Url,
    pub destination: Destination,
}

impl FetchRequest {
    /// Creates a request with the given method and no declared destination.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            destination: Destination::Empty,
        }
    }

    /// Parses `url` and creates a `GET` request for it.
    pub fn get(url: &str) -> Result<Self> {
        Ok(Self::new(Method::GET, Url::parse(url)?))
    }

    /// Sets the declared destination.
    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    /// Identity used for cache lookups and writes.
    pub fn key(&self) -> RequestKey {
        RequestKey::new(self.method.clone(), &self.url)
    }
}

// == Request Key ==
/// Cache identity of a request: its method and its URL without the fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    method: Method,
    url: String,
}

impl RequestKey {
    pub fn new(method: Method, url: &Url) -> Self {
        let mut url = url.clone();
        url.set_fragment(None);
        Self {
            method,
            url: url.into(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Only `GET` requests are storable or matchable.
    pub fn is_cacheable(&self) -> bool {
        self.method == Method::GET
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}
