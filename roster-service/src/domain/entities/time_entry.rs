use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shared::TimeEntryStatus;
use sqlx::FromRow;
use utoipa::ToSchema;

/// A clock-in record. `clock_out` is null exactly while status is active;
/// at most one active entry exists per staff member.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TimeEntry {
    pub id: i32,
    pub username: String,
    pub shift_id: Option<i32>,
    #[schema(value_type = String)]
    pub clock_in: NaiveDateTime,
    #[schema(value_type = Option<String>)]
    pub clock_out: Option<NaiveDateTime>,
    pub status: TimeEntryStatus,
}

impl TimeEntry {
    /// Hours worked for this entry, 0 unless completed.
    pub fn hours_worked(&self) -> f64 {
        match (self.status, self.clock_out) {
            (TimeEntryStatus::Completed, Some(out)) => {
                let hours = (out - self.clock_in).num_seconds() as f64 / 3600.0;
                (hours * 100.0).round() / 100.0
            }
            _ => 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == TimeEntryStatus::Active
    }
}
