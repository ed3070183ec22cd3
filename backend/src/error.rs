// src/error.rs

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;
use crate::validation::FieldError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Extractor failure that isn't about the input's shape, e.g. an oversized body.
    #[error("request rejected ({0}): {1}")]
    Rejected(StatusCode, String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": errors })),
            )
                .into_response(),
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": message }))).into_response()
            }
            ApiError::Rejected(status, message) => {
                (status, Json(json!({ "detail": message }))).into_response()
            }
            ApiError::Store(err) => {
                error!("Store operation failed: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let text = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_) => {
                ApiError::Validation(vec![rejection_to_field_error("body", &text)])
            }
            other => ApiError::Rejected(other.status(), text),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(vec![rejection_to_field_error("query", &rejection.body_text())])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(vec![rejection_to_field_error("path", &rejection.body_text())])
    }
}

/// Turn an extractor's serde message into a single field error.
///
/// serde reports a missing field as "missing field `email`" and a bad value
/// as "limit: invalid digit found in string"; both name the field, which
/// becomes the second `loc` segment.
fn rejection_to_field_error(source: &str, text: &str) -> FieldError {
    if let Some(field) = text
        .split("missing field `")
        .nth(1)
        .and_then(|rest| rest.split('`').next())
    {
        return FieldError::new(&[source, field], "Field required", "missing");
    }

    // Strip the extractor's "Failed to deserialize ...: " prefix, if any.
    let detail = text
        .split_once(": ")
        .map(|(prefix, rest)| if prefix.starts_with("Failed") { rest } else { text })
        .unwrap_or(text);

    match detail.split_once(": ") {
        Some((field, msg)) if is_field_path(field) => {
            FieldError::new(&[source, field], msg, "value_error")
        }
        _ => FieldError::new(&[source], detail, "value_error"),
    }
}

fn is_field_path(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '[' || c == ']')
}
