use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use shared::ApiResponse;

use crate::api::auth::Caller;
use crate::api::error::{map_domain_error, ApiError};
use crate::api::requests::CreateRequestBody;
use crate::api::state::AppState;
use crate::domain::entities::Request;

/// File a shift-change request for one of the caller's allocations
#[utoipa::path(
    post,
    path = "/api/v1/requests",
    request_body = CreateRequestBody,
    responses(
        (status = 201, description = "Request submitted", body = ApiResponse<Request>),
        (status = 404, description = "Shift not found"),
        (status = 409, description = "A pending request already exists"),
        (status = 422, description = "Caller is not allocated to the shift")
    ),
    tag = "requests"
)]
pub async fn create_request(
    State(state): State<AppState>,
    caller: Caller,
    Json(body): Json<CreateRequestBody>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state
        .requests
        .submit(&caller.username, body.shift_id, &body.reason, body.replacement)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Request submitted successfully", request)),
    ))
}

/// The caller's requests, newest first
#[utoipa::path(
    get,
    path = "/api/v1/requests",
    responses(
        (status = 200, description = "Requests", body = ApiResponse<Vec<Request>>)
    ),
    tag = "requests"
)]
pub async fn list_my_requests(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    let requests = state
        .requests
        .list_for_staff(&caller.username)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Requests retrieved successfully", requests)),
    ))
}

/// Every request in the system
#[utoipa::path(
    get,
    path = "/api/v1/requests/all",
    responses(
        (status = 200, description = "All requests", body = ApiResponse<Vec<Request>>),
        (status = 403, description = "Admin role required")
    ),
    tag = "requests"
)]
pub async fn list_all_requests(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    caller.require_admin()?;

    let requests = state.requests.list_all().await.map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Requests retrieved successfully", requests)),
    ))
}

/// Number of pending requests
#[utoipa::path(
    get,
    path = "/api/v1/requests/pending/count",
    responses(
        (status = 200, description = "Pending request count"),
        (status = 403, description = "Admin role required")
    ),
    tag = "requests"
)]
pub async fn pending_count(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    caller.require_admin()?;

    let count = state
        .requests
        .count_pending()
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Pending request count retrieved",
            serde_json::json!({ "pending": count }),
        )),
    ))
}

/// Approve a pending request
#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/approve",
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request approved", body = ApiResponse<Request>),
        (status = 404, description = "Request not found"),
        (status = 422, description = "Request is not pending"),
        (status = 403, description = "Admin role required")
    ),
    tag = "requests"
)]
pub async fn approve_request(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require_admin()?;

    let request = state.requests.approve(id).await.map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Request approved successfully", request)),
    ))
}

/// Reject a pending request
#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/reject",
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request rejected", body = ApiResponse<Request>),
        (status = 404, description = "Request not found"),
        (status = 422, description = "Request is not pending"),
        (status = 403, description = "Admin role required")
    ),
    tag = "requests"
)]
pub async fn reject_request(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    caller.require_admin()?;

    let request = state.requests.reject(id).await.map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Request rejected successfully", request)),
    ))
}

/// Cancel one of the caller's pending requests
#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/cancel",
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request cancelled", body = ApiResponse<Request>),
        (status = 404, description = "Request not found"),
        (status = 403, description = "Not the request owner"),
        (status = 422, description = "Request is not pending")
    ),
    tag = "requests"
)]
pub async fn cancel_request(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state
        .requests
        .cancel(id, &caller.username)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Request cancelled successfully", request)),
    ))
}

/// Upcoming allocated shifts the caller can file requests against
#[utoipa::path(
    get,
    path = "/api/v1/requests/shifts",
    responses(
        (status = 200, description = "Requestable shifts",
         body = ApiResponse<Vec<crate::domain::services::RequestableShift>>)
    ),
    tag = "requests"
)]
pub async fn requestable_shifts(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    let shifts = state
        .requests
        .requestable_shifts(&caller.username)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success("Shifts retrieved successfully", shifts)),
    ))
}

/// Candidate replacements for the caller
#[utoipa::path(
    get,
    path = "/api/v1/requests/replacements",
    responses(
        (status = 200, description = "Replacement candidates",
         body = ApiResponse<Vec<crate::domain::services::ReplacementCandidate>>)
    ),
    tag = "requests"
)]
pub async fn replacements(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    let candidates = state
        .requests
        .replacements(&caller.username)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Replacement candidates retrieved successfully",
            candidates,
        )),
    ))
}
