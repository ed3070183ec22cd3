// src/routes/root.rs
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::AppState;

pub const GREETING: &str = "Swift Website & SEO Services API";

#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// GET /api/
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse { message: GREETING })
}

/// GET /api/health
///
/// Pings the store; 503 when it can't be reached.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<serde_json::Value>) {
    if let Err(err) = state.store.ping().await {
        error!("DB health check failed: {:?}", err);
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "db": "down",
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "env": format!("{:?}", state.config.env),
        })),
    )
}
