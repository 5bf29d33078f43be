//! Health and provider listing handlers.

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub providers: usize,
    pub subscriptions: usize,
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime().as_secs(),
        providers: state.registry.len(),
        subscriptions: state.store.len(),
    })
}

/// GET /providers
pub async fn list_providers(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let providers = state.registry.declarations();
    Json(serde_json::json!({
        "count": providers.len(),
        "providers": providers,
    }))
}
