//! Request and Response models for the gateway API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! deserializing query strings and serializing JSON response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::FetchQuery;
pub use responses::{ActivateResponse, HealthResponse, StatsResponse};
