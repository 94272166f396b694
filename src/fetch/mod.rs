//! Fetch Module
//!
//! Request/response types exchanged with the host, and the network primitive.

mod network;
mod request;
mod response;

pub use network::{HttpFetcher, NetworkFetcher};
pub use request::{Destination, FetchRequest, RequestKey};
pub use response::FetchResponse;
