//! API error responses
//!
//! Validation and consent failures are detected before any mutation and
//! short-circuit the request; storage failures abort it. Provider failures
//! never reach this type — the insight client absorbs them.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Request-level error, mapped onto the HTTP status space
#[derive(Debug)]
pub enum ApiError {
    /// Malformed payload; carries one message per failed field
    Validation(Vec<String>),
    /// No consent on file (or an expired retention hold)
    ConsentRequired,
    /// Consent revoked, retention window in force
    ConsentRevoked,
    /// Unknown resource
    NotFound(String),
    /// Storage or other internal failure; carries the public message
    /// (the underlying error is logged at the call site)
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::ConsentRequired => (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "Consent is required before running burnout analysis."
                })),
            )
                .into_response(),
            ApiError::ConsentRevoked => (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "Consent has been revoked. Delete data or re-consent to continue analysis."
                })),
            )
                .into_response(),
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": message })),
            )
                .into_response(),
        }
    }
}
