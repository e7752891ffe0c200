use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shared::RequestStatus;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Shift-change request filed by a volunteer over one of their allocations.
/// PENDING -> APPROVED | REJECTED (admin, terminal); PENDING -> CANCELLED
/// (owner only).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Request {
    pub id: i32,
    pub username: String,
    pub shift_id: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub date: Option<NaiveDateTime>,
    pub time_slot: String,
    pub reason: String,
    pub replacement: Option<String>,
    pub status: RequestStatus,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
    #[schema(value_type = Option<String>)]
    pub approved_at: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>)]
    pub rejected_at: Option<NaiveDateTime>,
}

impl Request {
    /// Human-friendly slot description, e.g. "Monday, Mar 10: 09:00 AM to 10:00 AM".
    pub fn formatted_slot(&self) -> String {
        match self.date {
            Some(date) => format!("{}: {}", date.format("%A, %b %d"), self.time_slot),
            None => self.time_slot.clone(),
        }
    }
}
