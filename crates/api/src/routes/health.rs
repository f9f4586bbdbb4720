use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Which attendance store is wired in (`memory` or `postgres`).
    pub store_backend: &'static str,
    /// Whether the store is reachable.
    pub store_healthy: bool,
    /// Lifetime of newly generated QR tokens, so displays can size their
    /// rotation interval.
    pub token_ttl_secs: i64,
}

/// GET /health -- returns service and store health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.engine.store();
    let store_healthy = match store.health_check().await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Store health check failed");
            false
        }
    };

    let status = if store_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store_backend: store.backend_name(),
        store_healthy,
        token_ttl_secs: state.config.token_policy.ttl_secs(),
    })
}

/// Mount health check routes at the root.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
