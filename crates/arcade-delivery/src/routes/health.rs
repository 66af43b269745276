//! Health check endpoint: for load balancers, monitoring, and container health checks.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::Arc;

use crate::{AppState, Backend};

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Health check router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let healthy = match &state.backend {
        Backend::Ready { store, .. } => store.health_check().await,
        Backend::Unconfigured { .. } => false,
    };

    Json(HealthResponse {
        status: if healthy {
            "healthy".into()
        } else {
            "degraded".into()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
