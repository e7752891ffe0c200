use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Help desk assistant role attached to a student record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HelpDeskAssistant {
    pub username: String,
    pub rate: f64,
    pub active: bool,
    pub hours_worked: f64,
    pub hours_minimum: i32,
}

/// Lab assistant role. A distinct pool from help desk assistants as far as
/// the scheduler is concerned.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LabAssistant {
    pub username: String,
    pub active: bool,
    pub experience: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CourseCapability {
    pub id: i32,
    pub assistant_username: String,
    pub course_code: String,
}
