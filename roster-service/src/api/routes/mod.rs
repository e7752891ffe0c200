use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{handlers, state::AppState};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster Service API",
        version = "1.0.0",
        description = "Student assistant rostering: schedule generation, editing, \
                       time tracking and shift-change requests"
    ),
    paths(
        // Schedule endpoints
        handlers::schedule_handlers::get_current_schedule,
        handlers::schedule_handlers::generate_schedule,
        handlers::schedule_handlers::publish_schedule,
        handlers::schedule_handlers::clear_schedule,
        handlers::schedule_handlers::save_schedule,
        handlers::schedule_handlers::remove_staff,
        handlers::schedule_handlers::add_staff,
        handlers::schedule_handlers::schedule_stats,
        // Staff availability endpoints
        handlers::staff_handlers::available_staff,
        handlers::staff_handlers::check_availability,
        handlers::staff_handlers::batch_check_availability,
        // Time tracking endpoints
        handlers::tracking_handlers::clock_in,
        handlers::tracking_handlers::clock_out,
        handlers::tracking_handlers::mark_missed,
        handlers::tracking_handlers::staff_stats,
        handlers::tracking_handlers::auto_complete,
        // Volunteer endpoints
        handlers::volunteer_handlers::dashboard,
        handlers::volunteer_handlers::time_tracking,
        // Request endpoints
        handlers::request_handlers::create_request,
        handlers::request_handlers::list_my_requests,
        handlers::request_handlers::list_all_requests,
        handlers::request_handlers::pending_count,
        handlers::request_handlers::approve_request,
        handlers::request_handlers::reject_request,
        handlers::request_handlers::cancel_request,
        handlers::request_handlers::requestable_shifts,
        handlers::request_handlers::replacements,
        // Notification endpoints
        handlers::notification_handlers::list_notifications,
        handlers::notification_handlers::unread_count,
        handlers::notification_handlers::mark_read,
        handlers::notification_handlers::mark_all_read,
    ),
    components(schemas(
        // Shared types
        shared::ScheduleKind,
        shared::TimeEntryStatus,
        shared::RequestStatus,
        shared::NotificationKind,
        shared::Degree,
        // Entities
        crate::domain::entities::Allocation,
        crate::domain::entities::Request,
        crate::domain::entities::Notification,
        // Scheduler payloads
        crate::domain::scheduler::GenerationOptions,
        crate::domain::scheduler::CourseDemandOverride,
        crate::domain::scheduler::GenerationReport,
        crate::domain::scheduler::GenerationDetails,
        crate::domain::scheduler::ClearReport,
        // Service payloads
        crate::domain::services::AvailableStaff,
        crate::domain::services::AvailabilityCheck,
        crate::domain::services::AvailabilityWindow,
        crate::domain::services::BatchAvailabilityResult,
        crate::domain::services::ClockInResult,
        crate::domain::services::ClockOutResult,
        crate::domain::services::TodayShift,
        crate::domain::services::TodayShiftStatus,
        crate::domain::services::AttendanceStats,
        crate::domain::services::StatsWindow,
        crate::domain::services::ShiftHistoryEntry,
        crate::domain::services::DayDistribution,
        crate::domain::services::PublishReport,
        crate::domain::services::RequestableShift,
        crate::domain::services::ReplacementCandidate,
        // Presentation
        crate::presentation::ScheduleGrid,
        crate::presentation::GridDay,
        crate::presentation::GridShift,
        crate::presentation::GridStaff,
        crate::presentation::VolunteerDashboard,
        crate::presentation::VolunteerStudent,
        crate::presentation::NextShift,
        crate::presentation::UpcomingShift,
        crate::presentation::TimeTrackingSnapshot,
        crate::presentation::TimeTrackingActions,
        crate::presentation::ActionGate,
        // Request bodies
        crate::api::requests::GenerateScheduleRequest,
        crate::api::requests::SaveScheduleRequest,
        crate::api::requests::AssignmentEntry,
        crate::api::requests::StaffRef,
        crate::api::requests::RemoveStaffRequest,
        crate::api::requests::AddStaffRequest,
        crate::api::requests::ClearScheduleRequest,
        crate::api::requests::CheckAvailabilityRequest,
        crate::api::requests::BatchAvailabilityRequest,
        crate::api::requests::BatchQueryEntry,
        crate::api::requests::ClockInRequest,
        crate::api::requests::MarkMissedRequest,
        crate::api::requests::CreateRequestBody,
    )),
    tags(
        (name = "schedule", description = "Schedule generation, editing and publishing"),
        (name = "staff", description = "Availability resolution"),
        (name = "time-tracking", description = "Clock-in/out and attendance"),
        (name = "volunteer", description = "Volunteer dashboard and snapshots"),
        (name = "requests", description = "Shift-change request workflow"),
        (name = "notifications", description = "Notification outbox")
    )
)]
struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    let schedule_routes = Router::new()
        .route(
            "/schedule/current",
            get(handlers::schedule_handlers::get_current_schedule),
        )
        .route(
            "/schedule/generate",
            post(handlers::schedule_handlers::generate_schedule),
        )
        .route(
            "/schedule/:id/publish",
            post(handlers::schedule_handlers::publish_schedule),
        )
        .route(
            "/schedule/clear",
            post(handlers::schedule_handlers::clear_schedule),
        )
        .route(
            "/schedule/save",
            post(handlers::schedule_handlers::save_schedule),
        )
        .route(
            "/schedule/remove-staff",
            post(handlers::schedule_handlers::remove_staff),
        )
        .route(
            "/schedule/add-staff",
            post(handlers::schedule_handlers::add_staff),
        )
        .route(
            "/schedule/stats",
            get(handlers::schedule_handlers::schedule_stats),
        );

    let staff_routes = Router::new()
        .route(
            "/staff/available",
            get(handlers::staff_handlers::available_staff),
        )
        .route(
            "/staff/check-availability",
            post(handlers::staff_handlers::check_availability),
        )
        .route(
            "/staff/check-availability/batch",
            post(handlers::staff_handlers::batch_check_availability),
        );

    let tracking_routes = Router::new()
        .route(
            "/time-tracking/clock-in",
            post(handlers::tracking_handlers::clock_in),
        )
        .route(
            "/time-tracking/clock-out",
            post(handlers::tracking_handlers::clock_out),
        )
        .route(
            "/time-tracking/mark-missed",
            post(handlers::tracking_handlers::mark_missed),
        )
        .route(
            "/time-tracking/stats/:username",
            get(handlers::tracking_handlers::staff_stats),
        )
        .route(
            "/time-tracking/auto-complete",
            post(handlers::tracking_handlers::auto_complete),
        );

    let volunteer_routes = Router::new()
        .route(
            "/volunteer/dashboard",
            get(handlers::volunteer_handlers::dashboard),
        )
        .route(
            "/volunteer/time-tracking",
            get(handlers::volunteer_handlers::time_tracking),
        );

    let request_routes = Router::new()
        .route(
            "/requests",
            post(handlers::request_handlers::create_request)
                .get(handlers::request_handlers::list_my_requests),
        )
        .route(
            "/requests/all",
            get(handlers::request_handlers::list_all_requests),
        )
        .route(
            "/requests/pending/count",
            get(handlers::request_handlers::pending_count),
        )
        .route(
            "/requests/:id/approve",
            post(handlers::request_handlers::approve_request),
        )
        .route(
            "/requests/:id/reject",
            post(handlers::request_handlers::reject_request),
        )
        .route(
            "/requests/:id/cancel",
            post(handlers::request_handlers::cancel_request),
        )
        .route(
            "/requests/shifts",
            get(handlers::request_handlers::requestable_shifts),
        )
        .route(
            "/requests/replacements",
            get(handlers::request_handlers::replacements),
        );

    let notification_routes = Router::new()
        .route(
            "/notifications",
            get(handlers::notification_handlers::list_notifications),
        )
        .route(
            "/notifications/unread/count",
            get(handlers::notification_handlers::unread_count),
        )
        .route(
            "/notifications/:id/read",
            post(handlers::notification_handlers::mark_read),
        )
        .route(
            "/notifications/read-all",
            post(handlers::notification_handlers::mark_all_read),
        );

    let api_router = Router::new()
        .route("/health", get(handlers::health_check))
        .merge(schedule_routes)
        .merge(staff_routes)
        .merge(tracking_routes)
        .merge(volunteer_routes)
        .merge(request_routes)
        .merge(notification_routes);

    Router::new()
        .nest("/api/v1", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
