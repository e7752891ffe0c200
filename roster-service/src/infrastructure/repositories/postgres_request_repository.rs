use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::{DomainError, DomainResult, RequestStatus};
use sqlx::PgPool;

use crate::domain::entities::Request;
use crate::domain::repositories::{NewRequest, RequestRepository};

pub struct PostgresRequestRepository {
    pool: PgPool,
}

impl PostgresRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

const REQUEST_COLUMNS: &str = "id, username, shift_id, date, time_slot, reason, replacement, \
                               status, created_at, approved_at, rejected_at";

#[async_trait]
impl RequestRepository for PostgresRequestRepository {
    async fn create(
        &self,
        request: NewRequest,
        created_at: NaiveDateTime,
    ) -> DomainResult<Request> {
        let created = sqlx::query_as::<_, Request>(&format!(
            r#"
            INSERT INTO requests (username, shift_id, date, time_slot, reason, replacement, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {REQUEST_COLUMNS}
            "#
        ))
        .bind(&request.username)
        .bind(request.shift_id)
        .bind(request.date)
        .bind(&request.time_slot)
        .bind(&request.reason)
        .bind(&request.replacement)
        .bind(RequestStatus::Pending)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Request>> {
        let request = sqlx::query_as::<_, Request>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(request)
    }

    async fn set_status(
        &self,
        id: i32,
        status: RequestStatus,
        at: NaiveDateTime,
    ) -> DomainResult<Request> {
        let request = match status {
            RequestStatus::Approved => {
                sqlx::query_as::<_, Request>(&format!(
                    "UPDATE requests SET status = $1, approved_at = $2 WHERE id = $3 \
                     RETURNING {REQUEST_COLUMNS}"
                ))
                .bind(status)
                .bind(at)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
            }
            RequestStatus::Rejected => {
                sqlx::query_as::<_, Request>(&format!(
                    "UPDATE requests SET status = $1, rejected_at = $2 WHERE id = $3 \
                     RETURNING {REQUEST_COLUMNS}"
                ))
                .bind(status)
                .bind(at)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
            }
            _ => {
                sqlx::query_as::<_, Request>(&format!(
                    "UPDATE requests SET status = $1 WHERE id = $2 RETURNING {REQUEST_COLUMNS}"
                ))
                .bind(status)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(db_err)?
        .ok_or_else(|| DomainError::NotFound(format!("Request {} not found", id)))?;

        Ok(request)
    }

    async fn list_for_staff(&self, username: &str) -> DomainResult<Vec<Request>> {
        let requests = sqlx::query_as::<_, Request>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE username = $1 ORDER BY created_at DESC"
        ))
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(requests)
    }

    async fn list_all(&self) -> DomainResult<Vec<Request>> {
        let requests = sqlx::query_as::<_, Request>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(requests)
    }

    async fn pending_exists_for_shift(
        &self,
        username: &str,
        shift_id: i32,
    ) -> DomainResult<bool> {
        let found = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT 1
            FROM requests
            WHERE username = $1 AND shift_id = $2 AND status = $3
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(shift_id)
        .bind(RequestStatus::Pending)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(found.is_some())
    }

    async fn count_pending(&self) -> DomainResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM requests WHERE status = $1")
            .bind(RequestStatus::Pending)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(count)
    }
}
