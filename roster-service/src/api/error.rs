//! Mapping from domain error kinds to HTTP responses.
//!
//! Controllers never leak store errors verbatim; every failure is wrapped
//! in the standard response envelope.

use axum::http::StatusCode;
use axum::Json;
use shared::{ApiResponse, DomainError};

pub type ApiError = (StatusCode, Json<ApiResponse<serde_json::Value>>);

pub fn map_domain_error(error: DomainError) -> ApiError {
    let status = match &error {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::FailedPrecondition(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Unauthorized(_) => StatusCode::FORBIDDEN,
        DomainError::DatabaseError(_)
        | DomainError::SolverError(_)
        | DomainError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match &error {
        // Store failures stay in the logs.
        DomainError::DatabaseError(_) | DomainError::InternalError(_) => {
            tracing::error!(%error, "Internal error");
            "Internal server error".to_string()
        }
        _ => error.to_string(),
    };

    (status, Json(ApiResponse::error(message)))
}
