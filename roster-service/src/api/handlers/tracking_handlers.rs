use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::ApiResponse;

use crate::api::auth::Caller;
use crate::api::error::{map_domain_error, ApiError};
use crate::api::requests::{ClockInRequest, MarkMissedRequest};
use crate::api::state::AppState;
use crate::domain::services::{AttendanceStats, ClockInResult, ClockOutResult};

/// Clock the caller in
#[utoipa::path(
    post,
    path = "/api/v1/time-tracking/clock-in",
    request_body = ClockInRequest,
    responses(
        (status = 200, description = "Clocked in", body = ApiResponse<ClockInResult>),
        (status = 409, description = "Active entry already exists"),
        (status = 422, description = "Too early, or the shift has ended"),
        (status = 404, description = "Shift not found")
    ),
    tag = "time-tracking"
)]
pub async fn clock_in(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<ClockInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Reconcile any lingering session before opening a new one.
    state
        .attendance
        .check_and_complete_abandoned(&caller.username)
        .await
        .map_err(map_domain_error)?;

    let result = state
        .attendance
        .clock_in(&caller.username, request.shift_id)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Clocked in successfully", result)),
    ))
}

/// Clock the caller out
#[utoipa::path(
    post,
    path = "/api/v1/time-tracking/clock-out",
    responses(
        (status = 200, description = "Clocked out", body = ApiResponse<ClockOutResult>),
        (status = 404, description = "No active clock-in record")
    ),
    tag = "time-tracking"
)]
pub async fn clock_out(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .attendance
        .clock_out(&caller.username)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Clocked out successfully", result)),
    ))
}

/// Mark a shift missed for a staff member
#[utoipa::path(
    post,
    path = "/api/v1/time-tracking/mark-missed",
    request_body = MarkMissedRequest,
    responses(
        (status = 200, description = "Shift marked as missed"),
        (status = 404, description = "Shift not found"),
        (status = 409, description = "An entry already exists for this shift"),
        (status = 403, description = "Admin role required")
    ),
    tag = "time-tracking"
)]
pub async fn mark_missed(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<MarkMissedRequest>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require_admin()?;

    state
        .attendance
        .mark_missed(&request.staff_id, request.shift_id)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Shift marked as missed",
            serde_json::Value::Null,
        )),
    ))
}

/// Attendance statistics for one staff member
#[utoipa::path(
    get,
    path = "/api/v1/time-tracking/stats/{username}",
    params(("username" = String, Path, description = "Staff username")),
    responses(
        (status = 200, description = "Attendance stats", body = ApiResponse<AttendanceStats>),
        (status = 403, description = "Not the caller's own stats")
    ),
    tag = "time-tracking"
)]
pub async fn staff_stats(
    State(state): State<AppState>,
    caller: Caller,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if caller.username != username {
        caller.require_admin()?;
    }

    state
        .attendance
        .check_and_complete_abandoned(&username)
        .await
        .map_err(map_domain_error)?;

    let stats = state
        .attendance
        .stats(&username)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Attendance statistics retrieved successfully",
            stats,
        )),
    ))
}

/// Sweep every abandoned active entry
#[utoipa::path(
    post,
    path = "/api/v1/time-tracking/auto-complete",
    responses(
        (status = 200, description = "Sweep completed"),
        (status = 403, description = "Admin role required")
    ),
    tag = "time-tracking"
)]
pub async fn auto_complete(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    caller.require_admin()?;

    let completed = state
        .attendance
        .auto_complete_sweep()
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Abandoned sessions reconciled",
            serde_json::json!({ "completed": completed }),
        )),
    ))
}
