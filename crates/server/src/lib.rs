//! Server crate for the GreenRecs recommendation service.
//!
//! This crate contains the service layer that runs the recommendation flow
//! and the HTTP boundary exposing it.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod service;

pub use config::{AgentBackend, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use models::{ErrorResponse, MultiActivityRequest, RecommendationResponse, SingleActivityRequest};
pub use routes::{AppState, create_router};
pub use service::RecommendationService;

use std::sync::Arc;

use agent_client::{ChatCompletionsClient, LlmConfig, StageRunner};
use anyhow::{Context, Result};
use sources::CatalogAgent;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialise tracing: `RUST_LOG` wins over `default_filter`
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Build the stage runner for `backend`. The LLM backend reads its
/// endpoint and credentials from the environment.
pub fn build_runner(backend: AgentBackend) -> Result<Arc<dyn StageRunner>> {
    let runner: Arc<dyn StageRunner> = match backend {
        AgentBackend::Llm => {
            let config = LlmConfig::from_env().context("Failed to load LLM configuration")?;
            info!("Using LLM agent backend: {:?}", config);
            Arc::new(ChatCompletionsClient::new(config).context("Failed to build LLM client")?)
        }
        AgentBackend::Catalog => {
            info!("Using catalog agent backend");
            Arc::new(CatalogAgent::new())
        }
    };
    Ok(runner)
}

/// Serve `service` on `listener` until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    service: RecommendationService,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = create_router(service);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")
}
