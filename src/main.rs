//! Image Cache Worker - gateway binary
//!
//! Hosts the worker behind an HTTP gateway backed by in-memory cache storage.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_cache_worker::api::create_router;
use image_cache_worker::cache::MemoryCacheStorage;
use image_cache_worker::fetch::HttpFetcher;
use image_cache_worker::{AppState, Config, ImageCacheWorker};

/// Port the gateway listens on.
const GATEWAY_PORT: u16 = 3000;

/// Main entry point for the image cache gateway.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Build the worker with in-memory storage and an HTTP fetcher
/// 3. Run activation so outdated generations are gone before serving
/// 4. Start HTTP server and handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_cache_worker=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting image cache gateway");

    let config = Config::default();
    info!(
        "Configuration: cache={}, max_entries={}",
        config.current_cache_name(),
        config.max_entries
    );

    let worker = ImageCacheWorker::new(
        config,
        Arc::new(MemoryCacheStorage::new()),
        Arc::new(HttpFetcher::new()),
    );

    let deleted = worker.activate().await;
    info!("Worker activated, {} outdated cache(s) removed", deleted);

    let app = create_router(AppState::new(worker));

    let addr = SocketAddr::from(([0, 0, 0, 0], GATEWAY_PORT));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Gateway listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server failed")?;

    info!("Gateway shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
