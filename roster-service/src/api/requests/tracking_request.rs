use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ClockInRequest {
    #[serde(default)]
    pub shift_id: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkMissedRequest {
    pub staff_id: String,
    pub shift_id: i32,
}
