//! Error types for the image cache worker
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Worker Error Enum ==
/// Unified error type for the image cache worker.
#[derive(Error, Debug, Clone)]
pub enum WorkerError {
    /// The network fetch failed (connection, DNS, TLS, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// A cache storage operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// The request could not be understood or stored
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal failure, e.g. a background task panicked
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for WorkerError {
    fn from(err: reqwest::Error) -> Self {
        WorkerError::Network(err.to_string())
    }
}

impl From<url::ParseError> for WorkerError {
    fn from(err: url::ParseError) -> Self {
        WorkerError::InvalidRequest(format!("invalid url: {}", err))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for WorkerError {
    fn into_response(self) -> Response {
        let status = match &self {
            WorkerError::Network(_) => StatusCode::BAD_GATEWAY,
            WorkerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            WorkerError::Storage(_) | WorkerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the image cache worker.
pub type Result<T> = std::result::Result<T, WorkerError>;
