mod api;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;
use domain::repositories::{
    AvailabilityRepository, CourseRepository, NotificationRepository, RequestRepository,
    ScheduleRepository, StaffRepository, TimeEntryRepository,
};
use domain::scheduler::ScheduleGenerator;
use domain::services::{
    AttendanceService, AvailabilityService, Notifier, RequestService, ScheduleEditor,
};
use infrastructure::{
    config::Settings,
    database, redis,
    repositories::{
        PostgresAvailabilityRepository, PostgresCourseRepository, PostgresNotificationRepository,
        PostgresRequestRepository, PostgresScheduleRepository, PostgresStaffRepository,
        PostgresTimeEntryRepository,
    },
};
use presentation::ScheduleGridBuilder;
use shared::{Clock, SystemClock};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Roster Service...");

    // Load configuration
    let settings = Settings::new()?;
    tracing::info!("Configuration loaded: {:?}", settings);

    // Initialize database pool
    let db_pool =
        database::create_pool(&settings.database.url, settings.database.max_connections).await?;
    tracing::info!("Database connection pool created");

    // Run migrations
    database::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations completed");

    // Redis is an optional accelerator; the service runs without it.
    let redis_pool = match redis::create_redis_pool(&settings.redis.url).await {
        Ok(pool) => {
            tracing::info!("Redis connection established");
            Some(pool)
        }
        Err(error) => {
            tracing::warn!(%error, "Redis unavailable, caching disabled");
            None
        }
    };

    // Initialize repositories
    let staff_repo: Arc<dyn StaffRepository> =
        Arc::new(PostgresStaffRepository::new(db_pool.clone()));
    let course_repo: Arc<dyn CourseRepository> =
        Arc::new(PostgresCourseRepository::new(db_pool.clone()));
    let availability_repo: Arc<dyn AvailabilityRepository> =
        Arc::new(PostgresAvailabilityRepository::new(db_pool.clone()));
    let schedule_repo: Arc<dyn ScheduleRepository> =
        Arc::new(PostgresScheduleRepository::new(db_pool.clone()));
    let time_repo: Arc<dyn TimeEntryRepository> =
        Arc::new(PostgresTimeEntryRepository::new(db_pool.clone()));
    let request_repo: Arc<dyn RequestRepository> =
        Arc::new(PostgresRequestRepository::new(db_pool.clone()));
    let notification_repo: Arc<dyn NotificationRepository> =
        Arc::new(PostgresNotificationRepository::new(db_pool.clone()));

    tracing::info!("Repositories initialized");

    // Initialize services
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let notifier = Arc::new(Notifier::new(notification_repo.clone(), clock.clone()));

    let availability = Arc::new(AvailabilityService::new(
        staff_repo.clone(),
        availability_repo.clone(),
        schedule_repo.clone(),
        redis_pool.clone(),
    ));
    let editor = Arc::new(ScheduleEditor::new(
        schedule_repo.clone(),
        notifier.clone(),
        clock.clone(),
        redis_pool.clone(),
    ));
    let attendance = Arc::new(AttendanceService::new(
        time_repo.clone(),
        schedule_repo.clone(),
        notifier.clone(),
        clock.clone(),
        settings.attendance.early_clock_in_minutes,
        settings.attendance.max_session_hours,
    ));
    let requests = Arc::new(RequestService::new(
        request_repo.clone(),
        schedule_repo.clone(),
        staff_repo.clone(),
        notifier.clone(),
        clock.clone(),
    ));
    let generator = Arc::new(ScheduleGenerator::new(
        staff_repo.clone(),
        course_repo.clone(),
        availability_repo.clone(),
        schedule_repo.clone(),
        clock.clone(),
        Duration::from_secs(settings.scheduler.solver_time_budget_secs),
        Duration::from_secs(settings.scheduler.slow_solve_warn_secs),
    ));
    let grid = Arc::new(ScheduleGridBuilder::new(
        schedule_repo.clone(),
        staff_repo.clone(),
        availability_repo.clone(),
        redis_pool.clone(),
    ));

    tracing::info!("Services initialized");

    // Create application state
    let app_state = AppState::new(
        staff_repo,
        schedule_repo,
        notification_repo,
        availability,
        editor,
        attendance,
        requests,
        generator,
        grid,
        clock,
    );

    // Create router
    let app = api::create_router(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(settings.server_address()).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Roster Service listening on {}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
