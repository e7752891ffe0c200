use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::{DomainError, DomainResult, NotificationKind};
use sqlx::PgPool;

use crate::domain::entities::Notification;
use crate::domain::repositories::NotificationRepository;

pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn create(
        &self,
        username: &str,
        message: &str,
        kind: NotificationKind,
        created_at: NaiveDateTime,
    ) -> DomainResult<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (username, message, kind, is_read, created_at)
            VALUES ($1, $2, $3, FALSE, $4)
            RETURNING id, username, message, kind, is_read, created_at
            "#,
        )
        .bind(username)
        .bind(message)
        .bind(kind)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(notification)
    }

    async fn list_for_user(
        &self,
        username: &str,
        limit: i64,
        include_read: bool,
    ) -> DomainResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, username, message, kind, is_read, created_at
            FROM notifications
            WHERE username = $1 AND (is_read = FALSE OR $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(username)
        .bind(include_read)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(notifications)
    }

    async fn mark_read(&self, id: i32) -> DomainResult<bool> {
        let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark_all_read(&self, username: &str) -> DomainResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE username = $1 AND is_read = FALSE",
        )
        .bind(username)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected())
    }

    async fn count_unread(&self, username: &str) -> DomainResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE username = $1 AND is_read = FALSE",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(count)
    }
}
