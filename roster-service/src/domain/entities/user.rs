use serde::{Deserialize, Serialize};
use shared::{Degree, UserKind};
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Account header shared by admins and students. Per-kind detail lives in
/// separate tables joined by username.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub kind: UserKind,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.kind == UserKind::Admin
    }
}

/// Typed profile payload. Unknown keys survive round-trips through `extra`
/// but nothing at runtime depends on their presence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct StudentProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(flatten, default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub username: String,
    pub name: Option<String>,
    pub degree: Degree,
    #[schema(value_type = Option<StudentProfile>)]
    pub profile: Option<sqlx::types::Json<StudentProfile>>,
}

impl Student {
    /// Display name, falling back to the username when none is set.
    pub fn display_name(&self) -> &str {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }
}
