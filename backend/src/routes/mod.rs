// src/routes/mod.rs

use axum::{
    http::HeaderValue,
    routing::{delete, get, patch},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::CorsOrigins;
use crate::AppState;

pub mod leads;
pub mod root;
pub mod status;

/// All API routes live under `/api`.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/api", get(root::root_handler))
        .route("/api/", get(root::root_handler))
        .route("/api/health", get(root::health_handler))
        .route(
            "/api/status",
            get(status::list_status_checks_handler).post(status::create_status_check_handler),
        )
        .route(
            "/api/leads",
            get(leads::list_leads_handler).post(leads::create_lead_handler),
        )
        .route(
            "/api/leads/stats",
            get(leads::lead_stats_handler).delete(leads::delete_lead_named_stats_handler),
        )
        .route("/api/leads/:lead_id", delete(leads::delete_lead_handler))
        .route(
            "/api/leads/:lead_id/status",
            patch(leads::update_lead_status_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Credentials are allowed, so a wildcard can't be sent back literally:
/// with `*` the request's own origin, method and headers are mirrored.
fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::mirror_request(),
        CorsOrigins::List(list) => AllowOrigin::list(list.iter().filter_map(|origin| {
            match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            }
        })),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
