use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use shared::ScheduleKind;
use sqlx::FromRow;
use utoipa::ToSchema;

/// One of the two primary schedules (helpdesk=1, lab=2).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Schedule {
    pub id: i32,
    #[schema(value_type = String, example = "2025-03-10")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, example = "2025-03-14")]
    pub end_date: NaiveDate,
    pub kind: ScheduleKind,
    #[schema(value_type = String)]
    pub generated_at: NaiveDateTime,
    pub is_published: bool,
}

impl Schedule {
    /// Human-friendly date range string for display, e.g. "10 Mar - 14 Mar, 2025".
    pub fn formatted_date_range(&self) -> String {
        format!(
            "{} - {}",
            self.start_date.format("%d %b"),
            self.end_date.format("%d %b, %Y")
        )
    }
}

/// A scheduled time slot of fixed length on a specific date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Shift {
    pub id: i32,
    #[schema(value_type = String, example = "2025-03-10")]
    pub date: NaiveDate,
    #[schema(value_type = String)]
    pub start_time: NaiveDateTime,
    #[schema(value_type = String)]
    pub end_time: NaiveDateTime,
    pub schedule_id: i32,
}

impl Shift {
    /// 0 = Monday .. 6 = Sunday
    pub fn weekday_index(&self) -> i32 {
        self.date.weekday().num_days_from_monday() as i32
    }

    pub fn start_hour(&self) -> u32 {
        self.start_time.time().hour()
    }

    pub fn duration_hours(&self) -> f64 {
        (self.end_time - self.start_time).num_seconds() as f64 / 3600.0
    }

    /// Human-friendly time range, e.g. "09:00 AM to 10:00 AM".
    pub fn formatted_time(&self) -> String {
        format!(
            "{} to {}",
            self.start_time.format("%I:%M %p"),
            self.end_time.format("%I:%M %p")
        )
    }
}

/// Per-shift coverage goal for one course.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ShiftCourseDemand {
    pub id: i32,
    pub shift_id: i32,
    pub course_code: String,
    pub tutors_required: i32,
    pub weight: i32,
}

/// An assertion that a staff member is scheduled to work a shift.
/// At most one row per (shift, staff).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Allocation {
    pub id: i32,
    pub username: String,
    pub shift_id: i32,
    pub schedule_id: i32,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
}
