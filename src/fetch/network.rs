//! Network Fetch
//!
//! The network primitive the worker falls through to on a cache miss.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::fetch::{FetchRequest, FetchResponse};

/// Performs a request against the network.
///
/// Any completed HTTP exchange is `Ok`, whatever its status; `Err` means the
/// exchange itself failed.
#[async_trait]
pub trait NetworkFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}

// == HTTP Fetcher ==
/// [`NetworkFetcher`] backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NetworkFetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        debug!(url = %request.url, %status, bytes = body.len(), "network fetch completed");

        Ok(FetchResponse::from_parts(status, headers, body))
    }
}
