use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::Shift;

/// Recurring weekly window during which a staff member may be allocated.
/// Multiple windows per day are allowed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Availability {
    pub id: i32,
    pub username: String,
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: i32,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "17:00:00")]
    pub end_time: NaiveTime,
}

impl Availability {
    /// A window [start, end) covers hour `h` iff start <= h:00 < end.
    pub fn covers_hour(&self, hour: u32) -> bool {
        match NaiveTime::from_hms_opt(hour, 0, 0) {
            Some(at) => self.start_time <= at && at < self.end_time,
            None => false,
        }
    }

    /// Whether this window fully covers the given shift on its weekday.
    pub fn covers_shift(&self, shift: &Shift) -> bool {
        let shift_day = shift.weekday_index();
        self.day_of_week == shift_day
            && self.start_time <= shift.start_time.time()
            && shift.end_time.time() <= self.end_time
    }

}
