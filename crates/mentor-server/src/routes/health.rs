//! Health and public configuration routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use mentor_core::PublicConfig;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub rag_enabled: bool,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/config", get(get_config))
}

/// GET /health: liveness only; never contacts the provider.
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        environment: state.config.environment.clone(),
        rag_enabled: state.config.rag_enabled,
    })
}

/// GET /api/config: non-secret configuration.
async fn get_config(State(state): State<Arc<AppState>>) -> Json<PublicConfig> {
    Json(state.config.public_view())
}
