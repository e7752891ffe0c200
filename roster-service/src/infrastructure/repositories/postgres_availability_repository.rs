use async_trait::async_trait;
use shared::{DomainError, DomainResult};
use sqlx::PgPool;

use crate::domain::entities::Availability;
use crate::domain::repositories::AvailabilityRepository;

pub struct PostgresAvailabilityRepository {
    pool: PgPool,
}

impl PostgresAvailabilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for PostgresAvailabilityRepository {
    async fn list_for_staff_on_day(
        &self,
        username: &str,
        day_of_week: i32,
    ) -> DomainResult<Vec<Availability>> {
        let windows = sqlx::query_as::<_, Availability>(
            r#"
            SELECT id, username, day_of_week, start_time, end_time
            FROM availabilities
            WHERE username = $1 AND day_of_week = $2
            ORDER BY start_time
            "#,
        )
        .bind(username)
        .bind(day_of_week)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(windows)
    }

    async fn list_for_day(&self, day_of_week: i32) -> DomainResult<Vec<Availability>> {
        let windows = sqlx::query_as::<_, Availability>(
            r#"
            SELECT id, username, day_of_week, start_time, end_time
            FROM availabilities
            WHERE day_of_week = $1
            ORDER BY username, start_time
            "#,
        )
        .bind(day_of_week)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(windows)
    }

    async fn list_for_staff(&self, usernames: &[String]) -> DomainResult<Vec<Availability>> {
        let windows = sqlx::query_as::<_, Availability>(
            r#"
            SELECT id, username, day_of_week, start_time, end_time
            FROM availabilities
            WHERE username = ANY($1)
            ORDER BY username, day_of_week, start_time
            "#,
        )
        .bind(usernames)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(windows)
    }
}
