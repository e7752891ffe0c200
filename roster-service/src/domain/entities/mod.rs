mod assistant;
mod availability;
mod course;
mod notification;
mod request;
mod schedule;
mod time_entry;
mod user;

pub use assistant::{CourseCapability, HelpDeskAssistant, LabAssistant};
pub use availability::Availability;
pub use course::Course;
pub use notification::Notification;
pub use request::Request;
pub use schedule::{Allocation, Schedule, Shift, ShiftCourseDemand};
pub use time_entry::TimeEntry;
pub use user::{Student, StudentProfile, User};
