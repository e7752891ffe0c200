use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::ApiResponse;

use crate::api::auth::Caller;
use crate::api::error::{map_domain_error, ApiError};
use crate::api::requests::{
    AddStaffRequest, ClearScheduleRequest, GenerateScheduleRequest, RemoveStaffRequest,
    SaveScheduleRequest, ScheduleKindParams,
};
use crate::api::state::AppState;
use crate::domain::services::{AssignmentSlotInput, ShiftLocator};
use crate::presentation::ScheduleGrid;

/// Current schedule grid for a kind
#[utoipa::path(
    get,
    path = "/api/v1/schedule/current",
    params(ScheduleKindParams),
    responses(
        (status = 200, description = "Schedule grid", body = ApiResponse<ScheduleGrid>),
        (status = 500, description = "Internal server error")
    ),
    tag = "schedule"
)]
pub async fn get_current_schedule(
    State(state): State<AppState>,
    Query(params): Query<ScheduleKindParams>,
) -> Result<impl IntoResponse, ApiError> {
    let grid = state
        .grid
        .current_grid(params.kind)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Schedule retrieved successfully", grid)),
    ))
}

/// Run the schedule generator
#[utoipa::path(
    post,
    path = "/api/v1/schedule/generate",
    request_body = GenerateScheduleRequest,
    responses(
        (status = 200, description = "Generation report (success or solver error)",
         body = crate::domain::scheduler::GenerationReport),
        (status = 400, description = "Invalid date range"),
        (status = 403, description = "Admin role required")
    ),
    tag = "schedule"
)]
pub async fn generate_schedule(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<GenerateScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require_admin()?;

    let report = state
        .generator
        .generate(
            request.kind,
            request.start_date,
            request.end_date,
            request.options.unwrap_or_default(),
        )
        .await
        .map_err(map_domain_error)?;

    // Solver infeasibility and timeouts are ordinary results, not
    // transport failures.
    Ok((StatusCode::OK, Json(report)))
}

/// Publish a schedule and notify assigned staff
#[utoipa::path(
    post,
    path = "/api/v1/schedule/{id}/publish",
    params(("id" = i32, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Publish outcome", body = crate::domain::services::PublishReport),
        (status = 404, description = "Schedule not found"),
        (status = 403, description = "Admin role required")
    ),
    tag = "schedule"
)]
pub async fn publish_schedule(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require_admin()?;

    let report = state.editor.publish(id).await.map_err(map_domain_error)?;

    Ok((StatusCode::OK, Json(report)))
}

/// Clear the primary schedule of a kind
#[utoipa::path(
    post,
    path = "/api/v1/schedule/clear",
    request_body = ClearScheduleRequest,
    responses(
        (status = 200, description = "Clear report", body = ApiResponse<crate::domain::scheduler::ClearReport>),
        (status = 403, description = "Admin role required")
    ),
    tag = "schedule"
)]
pub async fn clear_schedule(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<ClearScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require_admin()?;

    let report = state
        .generator
        .clear(request.kind)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Schedule cleared successfully", report)),
    ))
}

/// Bulk upsert of grid assignments
#[utoipa::path(
    post,
    path = "/api/v1/schedule/save",
    request_body = SaveScheduleRequest,
    responses(
        (status = 200, description = "Assignments saved"),
        (status = 400, description = "Invalid day or time slot"),
        (status = 404, description = "Unknown staff member"),
        (status = 422, description = "Availability does not cover a shift"),
        (status = 403, description = "Admin role required")
    ),
    tag = "schedule"
)]
pub async fn save_schedule(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<SaveScheduleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require_admin()?;

    let slots = request
        .assignments
        .into_iter()
        .map(|entry| AssignmentSlotInput {
            day: entry.day,
            time: entry.time,
            staff: entry.staff.into_iter().map(|staff| staff.id).collect(),
        })
        .collect();

    state
        .editor
        .save_assignments(request.kind, request.start_date, request.end_date, slots)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Schedule assignments saved successfully.",
            serde_json::Value::Null,
        )),
    ))
}

/// Remove one allocation from a shift
#[utoipa::path(
    post,
    path = "/api/v1/schedule/remove-staff",
    request_body = RemoveStaffRequest,
    responses(
        (status = 200, description = "Allocation removed"),
        (status = 404, description = "Shift or allocation not found"),
        (status = 403, description = "Admin role required")
    ),
    tag = "schedule"
)]
pub async fn remove_staff(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<RemoveStaffRequest>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require_admin()?;

    state
        .editor
        .remove_allocation(
            request.kind,
            &request.staff_id,
            ShiftLocator {
                shift_id: request.shift_id,
                day: request.day,
                time: request.time,
            },
        )
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Staff removed from shift successfully.",
            serde_json::Value::Null,
        )),
    ))
}

/// Add one allocation to a shift
#[utoipa::path(
    post,
    path = "/api/v1/schedule/add-staff",
    request_body = AddStaffRequest,
    responses(
        (status = 201, description = "Allocation created"),
        (status = 404, description = "Shift or staff not found"),
        (status = 409, description = "Duplicate allocation"),
        (status = 422, description = "Availability does not cover the shift"),
        (status = 403, description = "Admin role required")
    ),
    tag = "schedule"
)]
pub async fn add_staff(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<AddStaffRequest>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require_admin()?;

    let allocation = state
        .editor
        .add_allocation(request.kind, &request.staff_id, request.shift_id)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Staff added to shift successfully.",
            allocation,
        )),
    ))
}

/// Coverage summary of the primary schedule of a kind
#[utoipa::path(
    get,
    path = "/api/v1/schedule/stats",
    params(ScheduleKindParams),
    responses(
        (status = 200, description = "Summary statistics"),
        (status = 403, description = "Admin role required")
    ),
    tag = "schedule"
)]
pub async fn schedule_stats(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<ScheduleKindParams>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require_admin()?;

    let stats = state
        .schedule_repo
        .summary_stats(params.kind.primary_id())
        .await
        .map_err(map_domain_error)?;

    let coverage = if stats.total_shifts > 0 {
        (stats.assigned_shifts as f64 / stats.total_shifts as f64 * 100.0 * 100.0).round() / 100.0
    } else {
        0.0
    };

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Schedule statistics retrieved successfully",
            serde_json::json!({
                "schedule_id": params.kind.primary_id(),
                "total_shifts": stats.total_shifts,
                "assigned_shifts": stats.assigned_shifts,
                "unassigned_shifts": stats.total_shifts - stats.assigned_shifts,
                "total_staff_assignments": stats.total_assignments,
                "coverage_percentage": coverage,
            }),
        )),
    ))
}
