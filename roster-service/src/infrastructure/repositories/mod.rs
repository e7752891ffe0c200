mod postgres_availability_repository;
mod postgres_course_repository;
mod postgres_notification_repository;
mod postgres_request_repository;
mod postgres_schedule_repository;
mod postgres_staff_repository;
mod postgres_time_entry_repository;

pub use postgres_availability_repository::PostgresAvailabilityRepository;
pub use postgres_course_repository::PostgresCourseRepository;
pub use postgres_notification_repository::PostgresNotificationRepository;
pub use postgres_request_repository::PostgresRequestRepository;
pub use postgres_schedule_repository::PostgresScheduleRepository;
pub use postgres_staff_repository::PostgresStaffRepository;
pub use postgres_time_entry_repository::PostgresTimeEntryRepository;
