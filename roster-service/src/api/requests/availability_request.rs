use serde::Deserialize;
use shared::ScheduleKind;
use utoipa::{IntoParams, ToSchema};

fn default_kind() -> ScheduleKind {
    ScheduleKind::Helpdesk
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailableStaffParams {
    #[serde(default = "default_kind")]
    pub kind: ScheduleKind,
    pub day: String,
    pub time: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckAvailabilityRequest {
    #[serde(default = "default_kind")]
    pub kind: ScheduleKind,
    pub staff_id: String,
    pub day: String,
    pub time: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchQueryEntry {
    pub staff_id: String,
    pub day: String,
    pub time: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchAvailabilityRequest {
    #[serde(default = "default_kind")]
    pub kind: ScheduleKind,
    pub queries: Vec<BatchQueryEntry>,
}
