use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::{DomainResult, NotificationKind};

use crate::domain::entities::Notification;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Append one notification
    async fn create(
        &self,
        username: &str,
        message: &str,
        kind: NotificationKind,
        created_at: NaiveDateTime,
    ) -> DomainResult<Notification>;

    /// Notifications for a user, newest first
    async fn list_for_user(
        &self,
        username: &str,
        limit: i64,
        include_read: bool,
    ) -> DomainResult<Vec<Notification>>;

    /// Mark one notification read; false when it does not exist
    async fn mark_read(&self, id: i32) -> DomainResult<bool>;

    /// Mark every unread notification of a user read, returning the count
    async fn mark_all_read(&self, username: &str) -> DomainResult<u64>;

    /// Unread notification count for a user
    async fn count_unread(&self, username: &str) -> DomainResult<i64>;
}
