//! Caller identity propagation.
//!
//! Session and token issuance live in the gateway in front of this
//! service; it forwards the authenticated principal in headers. Handlers
//! consume the `Caller` extractor and enforce role checks locally.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use shared::{ApiResponse, UserKind};

use crate::api::error::ApiError;

pub const USERNAME_HEADER: &str = "x-username";
pub const ROLE_HEADER: &str = "x-role";

#[derive(Debug, Clone)]
pub struct Caller {
    pub username: String,
    pub role: UserKind,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == UserKind::Admin
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err((
                StatusCode::FORBIDDEN,
                Json(ApiResponse::error("Admin role required")),
            ))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let username = parts
            .headers
            .get(USERNAME_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Missing authenticated user")),
            ))?;

        let role = match parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
        {
            Some(value) if value.eq_ignore_ascii_case("admin") => UserKind::Admin,
            _ => UserKind::Student,
        };

        Ok(Caller { username, role })
    }
}
