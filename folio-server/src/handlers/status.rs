use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::{Value, json};
use tracing::warn;

use crate::infra::app_state::AppState;

pub async fn ping_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Folio catalog service is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Liveness plus a database reachability probe.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.catalog.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "reachable",
            })),
        ),
        Err(err) => {
            warn!("health probe failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "database": err.to_string(),
                })),
            )
        }
    }
}
