//! Research Mentor: chat relay server.

use std::sync::Arc;

use mentor_core::RelayConfig;
use mentor_server::{build_router, AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RelayConfig::from_env()?;

    // RUST_LOG wins over LOG_LEVEL
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    if config.provider_credentials().is_none() {
        warn!("AZURE_OPENAI_ENDPOINT or AZURE_OPENAI_API_KEY not set; /api/chat will fail");
    }
    if config.rag_enabled && config.search_endpoint.is_none() {
        warn!("ENABLE_RAG is on but AZURE_SEARCH_ENDPOINT is not set; retrieval is skipped");
    }
    info!(
        "Environment: {}, deployment: {}, static assets: {}",
        config.environment,
        config.deployment,
        config.static_dir.display()
    );

    let port = config.port;
    let state = Arc::new(AppState::new(config)?);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Research Mentor listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
