//! Fetch Responses
//!
//! A fully buffered response. The body is read from the network once into an
//! owned [`Bytes`] buffer; copies share that buffer.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;

// == Fetch Response ==
#[derive(Debug, Clone)]
pub struct FetchResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl FetchResponse {
    /// Creates a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::from_parts(status, HeaderMap::new(), body.into())
    }

    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Adds a header, replacing any previous value.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// True for 2xx statuses.
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// Returns an independent copy for storage.
    ///
    /// Both copies read the same immutable buffer, so neither can drain the other.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }
}

impl IntoResponse for FetchResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        // Hop-by-hop framing no longer applies to a buffered body
        response.headers_mut().remove(header::TRANSFER_ENCODING);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ok_range() {
        assert!(FetchResponse::new(StatusCode::OK, "x").is_ok());
        assert!(FetchResponse::new(StatusCode::NO_CONTENT, "").is_ok());
        assert!(!FetchResponse::new(StatusCode::NOT_MODIFIED, "").is_ok());
        assert!(!FetchResponse::new(StatusCode::NOT_FOUND, "").is_ok());
        assert!(!FetchResponse::new(StatusCode::BAD_GATEWAY, "").is_ok());
    }

    #[test]
    fn test_duplicate_shares_body() {
        let original = FetchResponse::new(StatusCode::OK, vec![1u8, 2, 3]);
        let copy = original.duplicate();
        assert_eq!(copy.body(), original.body());
        assert_eq!(copy.body().as_ptr(), original.body().as_ptr());
    }

    #[test]
    fn test_into_response_keeps_status_and_headers() {
        let response = FetchResponse::new(StatusCode::CREATED, "img")
            .with_header(header::CONTENT_TYPE, HeaderValue::from_static("image/png"))
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    }
}
