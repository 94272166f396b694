//! API Module
//!
//! HTTP gateway that hosts the worker.
//!
//! # Endpoints
//! - `GET /fetch` - Deliver a fetch event for a URL
//! - `POST /activate` - Deliver an activate event
//! - `GET /stats` - Get worker statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
