mod availability_repository;
mod course_repository;
mod notification_repository;
mod request_repository;
mod schedule_repository;
mod staff_repository;
mod time_entry_repository;

pub use availability_repository::AvailabilityRepository;
pub use course_repository::CourseRepository;
pub use notification_repository::NotificationRepository;
pub use request_repository::{NewRequest, RequestRepository};
pub use schedule_repository::{
    NewCourseDemand, NewShift, SavedSlot, ScheduleRepository, ScheduleStats,
};
pub use staff_repository::StaffRepository;
pub use time_entry_repository::TimeEntryRepository;
