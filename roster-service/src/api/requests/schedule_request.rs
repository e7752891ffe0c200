use chrono::NaiveDate;
use serde::Deserialize;
use shared::ScheduleKind;
use utoipa::{IntoParams, ToSchema};

use crate::domain::scheduler::GenerationOptions;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ScheduleKindParams {
    pub kind: ScheduleKind,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateScheduleRequest {
    pub kind: ScheduleKind,
    #[schema(value_type = String, example = "2025-03-10")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, example = "2025-03-14")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub options: Option<GenerationOptions>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StaffRef {
    pub id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignmentEntry {
    pub day: String,
    pub time: String,
    #[serde(default)]
    pub staff: Vec<StaffRef>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveScheduleRequest {
    pub kind: ScheduleKind,
    #[schema(value_type = String, example = "2025-03-10")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, example = "2025-03-14")]
    pub end_date: NaiveDate,
    pub assignments: Vec<AssignmentEntry>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveStaffRequest {
    pub kind: ScheduleKind,
    pub staff_id: String,
    #[serde(default)]
    pub shift_id: Option<i32>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddStaffRequest {
    pub kind: ScheduleKind,
    pub staff_id: String,
    pub shift_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClearScheduleRequest {
    pub kind: ScheduleKind,
}
