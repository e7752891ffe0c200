use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shared::NotificationKind;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Append-only outbox row consumed by the delivery layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: i32,
    pub username: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
}

impl Notification {
    /// "Today at 3:00 PM" style label relative to `now`.
    pub fn friendly_time(&self, now: NaiveDateTime) -> String {
        let days = (now.date() - self.created_at.date()).num_days();
        let at = self.created_at.format("%I:%M %p");

        match days {
            0 => format!("Today at {}", at),
            1 => format!("Yesterday at {}", at),
            2..=6 => format!("{} at {}", self.created_at.format("%A"), at),
            _ => format!("{} at {}", self.created_at.format("%B %d, %Y"), at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_friendly_time_same_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let notification = Notification {
            id: 1,
            username: "816000001".to_string(),
            message: "You clocked in.".to_string(),
            kind: NotificationKind::ClockIn,
            is_read: false,
            created_at: date.and_hms_opt(15, 0, 0).unwrap(),
        };

        let now = date.and_hms_opt(18, 30, 0).unwrap();
        assert_eq!(notification.friendly_time(now), "Today at 03:00 PM");
    }
}
