pub mod notification_handlers;
pub mod request_handlers;
pub mod schedule_handlers;
pub mod staff_handlers;
pub mod tracking_handlers;
pub mod volunteer_handlers;

use axum::{http::StatusCode, response::IntoResponse, Json};

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "healthy" })),
    )
}
