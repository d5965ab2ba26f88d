//! GreenRecs HTTP server.
//!
//! Loads the reference dataset, builds the configured agent backend and
//! serves the recommendation endpoints until Ctrl+C or SIGTERM.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use data_loader::ReferenceCatalog;
use server::{RecommendationService, ServerConfig, build_runner, init_tracing, serve};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;
    init_tracing(&config.log_filter);

    info!("Starting GreenRecs server");

    info!("Loading reference dataset from {}...", config.catalog_path.display());
    let start = Instant::now();
    let catalog = Arc::new(
        ReferenceCatalog::load_from_file(&config.catalog_path)
            .context("Failed to load reference dataset")?,
    );
    let (activities, records) = catalog.counts();
    info!(
        "Reference dataset loaded: {} activities, {} records in {:.2?}",
        activities,
        records,
        start.elapsed()
    );

    let runner = build_runner(config.backend)?;
    let service = RecommendationService::new(runner, catalog);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Server listening on: http://{}", addr);

    serve(listener, service, shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received shutdown signal");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install TERM handler")
            .recv()
            .await;
        info!("Received TERM signal");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
