use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use shared::ApiResponse;
use utoipa::IntoParams;

use crate::api::auth::Caller;
use crate::api::error::{map_domain_error, ApiError};
use crate::api::state::AppState;
use crate::domain::entities::Notification;

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct NotificationParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub include_read: bool,
}

/// The caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(NotificationParams),
    responses(
        (status = 200, description = "Notifications", body = ApiResponse<Vec<Notification>>)
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<NotificationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let notifications = state
        .notification_repo
        .list_for_user(&caller.username, params.limit, params.include_read)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Notifications retrieved successfully",
            notifications,
        )),
    ))
}

/// Unread notification count for the caller
#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread/count",
    responses((status = 200, description = "Unread count")),
    tag = "notifications"
)]
pub async fn unread_count(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    let count = state
        .notification_repo
        .count_unread(&caller.username)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Unread count retrieved",
            serde_json::json!({ "unread": count }),
        )),
    ))
}

/// Mark one notification read
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked read"),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .notification_repo
        .mark_read(id)
        .await
        .map_err(map_domain_error)?;

    if !updated {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Notification not found")),
        ));
    }

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Notification marked as read",
            serde_json::Value::Null,
        )),
    ))
}

/// Mark every unread notification of the caller read
#[utoipa::path(
    post,
    path = "/api/v1/notifications/read-all",
    responses((status = 200, description = "All marked read")),
    tag = "notifications"
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .notification_repo
        .mark_all_read(&caller.username)
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Notifications marked as read",
            serde_json::json!({ "updated": updated }),
        )),
    ))
}
