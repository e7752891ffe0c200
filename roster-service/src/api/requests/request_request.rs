use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRequestBody {
    pub shift_id: i32,
    pub reason: String,
    #[serde(default)]
    pub replacement: Option<String>,
}
