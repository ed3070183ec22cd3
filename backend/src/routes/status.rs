// src/routes/status.rs
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::info;

use crate::error::ApiError;
use crate::status::{StatusCheck, StatusCheckCreate};
use crate::validation::Validate;
use crate::AppState;

/// POST /api/status
pub async fn create_status_check_handler(
    State(state): State<AppState>,
    payload: Result<Json<StatusCheckCreate>, JsonRejection>,
) -> Result<Json<StatusCheck>, ApiError> {
    let Json(input) = payload?;
    input.validate()?;

    let check = state.status_checks.create(input).await?;
    info!("Recorded status check {} from {}", check.id, check.client_name);

    Ok(Json(check))
}

/// GET /api/status
pub async fn list_status_checks_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<StatusCheck>>, ApiError> {
    Ok(Json(state.status_checks.list().await?))
}
