use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::{DomainResult, RequestStatus};

use crate::domain::entities::Request;

/// Fields of a new shift-change request.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub username: String,
    pub shift_id: Option<i32>,
    pub date: Option<NaiveDateTime>,
    pub time_slot: String,
    pub reason: String,
    pub replacement: Option<String>,
}

#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// Create a pending request
    async fn create(&self, request: NewRequest, created_at: NaiveDateTime)
        -> DomainResult<Request>;

    /// Find a request by id
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Request>>;

    /// Set a terminal or cancelled status with its timestamp
    async fn set_status(
        &self,
        id: i32,
        status: RequestStatus,
        at: NaiveDateTime,
    ) -> DomainResult<Request>;

    /// Requests of one staff member, newest first
    async fn list_for_staff(&self, username: &str) -> DomainResult<Vec<Request>>;

    /// All requests, newest first
    async fn list_all(&self) -> DomainResult<Vec<Request>>;

    /// Whether a pending request already exists for (staff, shift)
    async fn pending_exists_for_shift(&self, username: &str, shift_id: i32)
        -> DomainResult<bool>;

    /// Number of pending requests
    async fn count_pending(&self) -> DomainResult<i64>;
}
