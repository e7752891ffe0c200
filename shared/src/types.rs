use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The two rosters managed by the service. Each has a fixed primary
/// schedule id that the editor and viewers target by default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "schedule_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    Helpdesk,
    Lab,
}

impl ScheduleKind {
    pub fn primary_id(&self) -> i32 {
        match self {
            ScheduleKind::Helpdesk => 1,
            ScheduleKind::Lab => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    Admin,
    Student,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "degree")]
pub enum Degree {
    #[sqlx(rename = "BSc")]
    #[serde(rename = "BSc")]
    BSc,
    #[sqlx(rename = "MSc")]
    #[serde(rename = "MSc")]
    MSc,
}

impl Degree {
    /// Default hourly rate for a help desk assistant holding this degree.
    pub fn default_rate(&self) -> f64 {
        match self {
            Degree::BSc => 20.0,
            Degree::MSc => 35.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "time_entry_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TimeEntryStatus {
    Active,
    Completed,
    Absent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

/// Closed set of notification kinds emitted by the core.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Approval,
    Rejection,
    ClockIn,
    ClockOut,
    Schedule,
    Reminder,
    Request,
    Missed,
    Update,
    PasswordReset,
}
