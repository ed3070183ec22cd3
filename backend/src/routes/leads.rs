// src/routes/leads.rs
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::error::ApiError;
use crate::leads::{
    ContactLeadCreate, ContactLeadResponse, LeadDeleted, LeadListQuery, LeadStats,
    StatusUpdateQuery, StatusUpdated,
};
use crate::validation::Validate;
use crate::AppState;

const LEAD_NOT_FOUND: &str = "Lead not found";

/// POST /api/leads
///
/// Validates the submission (email format included) before anything is stored.
pub async fn create_lead_handler(
    State(state): State<AppState>,
    payload: Result<Json<ContactLeadCreate>, JsonRejection>,
) -> Result<Json<ContactLeadResponse>, ApiError> {
    let Json(input) = payload?;
    input.validate()?;

    let lead = state.leads.create(input).await?;
    info!("Created lead {} (trade={})", lead.id, lead.trade);

    Ok(Json(lead.into()))
}

/// GET /api/leads?status=&limit=
pub async fn list_leads_handler(
    State(state): State<AppState>,
    query: Result<Query<LeadListQuery>, QueryRejection>,
) -> Result<Json<Vec<ContactLeadResponse>>, ApiError> {
    let Query(query) = query?;
    query.validate()?;

    let leads = state.leads.list(query.status_filter(), query.limit()).await?;

    Ok(Json(leads.into_iter().map(ContactLeadResponse::from).collect()))
}

/// PATCH /api/leads/:lead_id/status?status=
pub async fn update_lead_status_handler(
    State(state): State<AppState>,
    lead_id: Result<Path<String>, PathRejection>,
    query: Result<Query<StatusUpdateQuery>, QueryRejection>,
) -> Result<Json<StatusUpdated>, ApiError> {
    let Path(lead_id) = lead_id?;
    let Query(StatusUpdateQuery { status }) = query?;

    if !state.leads.update_status(&lead_id, &status).await? {
        return Err(ApiError::NotFound(LEAD_NOT_FOUND.to_string()));
    }
    info!("Lead {} status set to '{}'", lead_id, status);

    Ok(Json(StatusUpdated {
        message: "Status updated".to_string(),
        lead_id,
        status,
    }))
}

/// DELETE /api/leads/:lead_id
pub async fn delete_lead_handler(
    State(state): State<AppState>,
    lead_id: Result<Path<String>, PathRejection>,
) -> Result<Json<LeadDeleted>, ApiError> {
    let Path(lead_id) = lead_id?;
    delete_lead(&state, lead_id).await
}

/// DELETE /api/leads/stats
///
/// The static `stats` route shadows `:lead_id`, so a delete aimed at it is
/// treated as a delete of the lead whose id is literally "stats".
pub async fn delete_lead_named_stats_handler(
    State(state): State<AppState>,
) -> Result<Json<LeadDeleted>, ApiError> {
    delete_lead(&state, "stats".to_string()).await
}

async fn delete_lead(state: &AppState, lead_id: String) -> Result<Json<LeadDeleted>, ApiError> {
    if !state.leads.delete(&lead_id).await? {
        return Err(ApiError::NotFound(LEAD_NOT_FOUND.to_string()));
    }
    info!("Deleted lead {}", lead_id);

    Ok(Json(LeadDeleted {
        message: "Lead deleted".to_string(),
        lead_id,
    }))
}

/// GET /api/leads/stats
pub async fn lead_stats_handler(
    State(state): State<AppState>,
) -> Result<Json<LeadStats>, ApiError> {
    Ok(Json(state.leads.stats().await?))
}
