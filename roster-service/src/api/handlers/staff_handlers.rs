use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::ApiResponse;

use crate::api::error::{map_domain_error, ApiError};
use crate::api::requests::{
    AvailableStaffParams, BatchAvailabilityRequest, CheckAvailabilityRequest,
};
use crate::api::state::AppState;
use crate::domain::services::{AvailabilityCheck, AvailableStaff, BatchAvailabilityQuery};

/// Staff available for a (day, time) slot
#[utoipa::path(
    get,
    path = "/api/v1/staff/available",
    params(AvailableStaffParams),
    responses(
        (status = 200, description = "Available staff", body = ApiResponse<Vec<AvailableStaff>>),
        (status = 400, description = "Invalid day or time slot")
    ),
    tag = "staff"
)]
pub async fn available_staff(
    State(state): State<AppState>,
    Query(params): Query<AvailableStaffParams>,
) -> Result<impl IntoResponse, ApiError> {
    let staff = state
        .availability
        .list_available(params.kind, &params.day, &params.time)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Available staff retrieved successfully",
            staff,
        )),
    ))
}

/// Check one staff member's availability for a slot
#[utoipa::path(
    post,
    path = "/api/v1/staff/check-availability",
    request_body = CheckAvailabilityRequest,
    responses(
        (status = 200, description = "Availability check", body = ApiResponse<AvailabilityCheck>),
        (status = 400, description = "Invalid day or time slot"),
        (status = 404, description = "Staff member not found")
    ),
    tag = "staff"
)]
pub async fn check_availability(
    State(state): State<AppState>,
    Json(request): Json<CheckAvailabilityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let check = state
        .availability
        .is_available(request.kind, &request.staff_id, &request.day, &request.time)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Availability checked", check)),
    ))
}

/// Evaluate many availability queries in one call
#[utoipa::path(
    post,
    path = "/api/v1/staff/check-availability/batch",
    request_body = BatchAvailabilityRequest,
    responses(
        (status = 200, description = "Batch results",
         body = ApiResponse<Vec<crate::domain::services::BatchAvailabilityResult>>)
    ),
    tag = "staff"
)]
pub async fn batch_check_availability(
    State(state): State<AppState>,
    Json(request): Json<BatchAvailabilityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let queries = request
        .queries
        .into_iter()
        .map(|entry| BatchAvailabilityQuery {
            staff_id: entry.staff_id,
            day: entry.day,
            time: entry.time,
        })
        .collect();

    let results = state
        .availability
        .batch_available(request.kind, queries)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Batch availability evaluated", results)),
    ))
}
