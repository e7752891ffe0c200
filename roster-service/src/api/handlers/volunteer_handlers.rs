use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Duration;
use shared::ApiResponse;

use crate::api::auth::Caller;
use crate::api::error::{map_domain_error, ApiError};
use crate::api::state::AppState;
use crate::domain::services::TodayShift;
use crate::presentation::{
    NextShift, TimeTrackingActions, TimeTrackingSnapshot, UpcomingShift, VolunteerDashboard,
    VolunteerStudent,
};

/// How far ahead the dashboard looks for upcoming shifts.
const DASHBOARD_HORIZON_DAYS: i64 = 14;

/// Dashboard snapshot for the authenticated volunteer
#[utoipa::path(
    get,
    path = "/api/v1/volunteer/dashboard",
    responses(
        (status = 200, description = "Dashboard data", body = ApiResponse<VolunteerDashboard>),
        (status = 404, description = "Student record not found")
    ),
    tag = "volunteer"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    // Reconcile lingering sessions before reading the snapshot.
    state
        .attendance
        .check_and_complete_abandoned(&caller.username)
        .await
        .map_err(map_domain_error)?;

    let student = state
        .staff_repo
        .find_student(&caller.username)
        .await
        .map_err(map_domain_error)?
        .ok_or_else(|| {
            map_domain_error(shared::DomainError::NotFound(
                "Student record not found".to_string(),
            ))
        })?;

    let now = state.clock.now();
    let upcoming = state
        .schedule_repo
        .shifts_for_staff_between(
            &caller.username,
            now.date(),
            now.date() + Duration::days(DASHBOARD_HORIZON_DAYS),
        )
        .await
        .map_err(map_domain_error)?;

    let today = state
        .attendance
        .today_shift(&caller.username)
        .await
        .unwrap_or_else(|_| TodayShift::error());

    let kind = shared::ScheduleKind::Helpdesk;
    let grid = state
        .grid
        .current_grid(kind)
        .await
        .map_err(map_domain_error)?;

    let dashboard = VolunteerDashboard {
        student: VolunteerStudent::from(&student),
        next_shift: NextShift::build(&today, &upcoming, now),
        upcoming_shifts: upcoming.iter().map(UpcomingShift::from).collect(),
        schedule: grid,
        generated_at: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
    };

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Dashboard data retrieved successfully",
            dashboard,
        )),
    ))
}

/// Time-tracking snapshot for the authenticated volunteer
#[utoipa::path(
    get,
    path = "/api/v1/volunteer/time-tracking",
    responses(
        (status = 200, description = "Time tracking snapshot",
         body = ApiResponse<TimeTrackingSnapshot>)
    ),
    tag = "volunteer"
)]
pub async fn time_tracking(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<impl IntoResponse, ApiError> {
    state
        .attendance
        .check_and_complete_abandoned(&caller.username)
        .await
        .map_err(map_domain_error)?;

    let today_shift = state
        .attendance
        .today_shift(&caller.username)
        .await
        .unwrap_or_else(|_| TodayShift::error());
    let stats = state
        .attendance
        .stats(&caller.username)
        .await
        .map_err(map_domain_error)?;
    let weekly_distribution = state
        .attendance
        .time_distribution(&caller.username)
        .await
        .map_err(map_domain_error)?;
    let recent_shifts = state
        .attendance
        .shift_history(&caller.username, 10)
        .await
        .map_err(map_domain_error)?;

    let snapshot = TimeTrackingSnapshot {
        actions: TimeTrackingActions::from_today_shift(&today_shift),
        today_shift,
        stats,
        weekly_distribution,
        recent_shifts,
        generated_at: state.clock.now().format("%Y-%m-%dT%H:%M:%S").to_string(),
    };

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            "Time tracking data retrieved successfully",
            snapshot,
        )),
    ))
}
