use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::{DomainError, DomainResult, TimeEntryStatus};
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;

use crate::domain::entities::{Shift, TimeEntry};
use crate::domain::repositories::TimeEntryRepository;

pub struct PostgresTimeEntryRepository {
    pool: PgPool,
}

impl PostgresTimeEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn shifts_by_ids(&self, shift_ids: &[i32]) -> DomainResult<HashMap<i32, Shift>> {
        if shift_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let shifts = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, date, start_time, end_time, schedule_id
            FROM shifts
            WHERE id = ANY($1)
            "#,
        )
        .bind(shift_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(shifts.into_iter().map(|shift| (shift.id, shift)).collect())
    }

    fn pair_with_shifts(
        entries: Vec<TimeEntry>,
        shifts: HashMap<i32, Shift>,
    ) -> Vec<(TimeEntry, Option<Shift>)> {
        entries
            .into_iter()
            .map(|entry| {
                let shift = entry.shift_id.and_then(|id| shifts.get(&id).cloned());
                (entry, shift)
            })
            .collect()
    }
}

fn db_err(e: sqlx::Error) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Serialize clock-in/clock-out races per staff member by locking the
/// student row for the duration of the transaction.
async fn lock_staff_row(tx: &mut Transaction<'_, Postgres>, username: &str) -> DomainResult<()> {
    let found = sqlx::query_scalar::<_, String>(
        "SELECT username FROM students WHERE username = $1 FOR UPDATE",
    )
    .bind(username)
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_err)?;

    if found.is_none() {
        return Err(DomainError::NotFound("Staff member not found.".to_string()));
    }

    Ok(())
}

/// Credit completed hours to the assistant's ledger. Lab assistants carry
/// no ledger row; the update is a no-op for them.
async fn credit_hours(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
    hours: f64,
) -> DomainResult<()> {
    sqlx::query(
        r#"
        UPDATE help_desk_assistants
        SET hours_worked = hours_worked + $1
        WHERE username = $2
        "#,
    )
    .bind(hours)
    .bind(username)
    .execute(&mut **tx)
    .await
    .map_err(db_err)?;

    Ok(())
}

#[async_trait]
impl TimeEntryRepository for PostgresTimeEntryRepository {
    async fn find_active(&self, username: &str) -> DomainResult<Option<TimeEntry>> {
        let entry = sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, username, shift_id, clock_in, clock_out, status
            FROM time_entries
            WHERE username = $1 AND status = $2
            "#,
        )
        .bind(username)
        .bind(TimeEntryStatus::Active)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(entry)
    }

    async fn insert_active(
        &self,
        username: &str,
        shift_id: Option<i32>,
        clock_in: NaiveDateTime,
    ) -> DomainResult<TimeEntry> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        lock_staff_row(&mut tx, username).await?;

        let active = sqlx::query_scalar::<_, i32>(
            "SELECT 1 FROM time_entries WHERE username = $1 AND status = $2",
        )
        .bind(username)
        .bind(TimeEntryStatus::Active)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;
        if active.is_some() {
            return Err(DomainError::Conflict(
                "You already have an active clock-in record".to_string(),
            ));
        }

        let entry = sqlx::query_as::<_, TimeEntry>(
            r#"
            INSERT INTO time_entries (username, shift_id, clock_in, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, shift_id, clock_in, clock_out, status
            "#,
        )
        .bind(username)
        .bind(shift_id)
        .bind(clock_in)
        .bind(TimeEntryStatus::Active)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(entry)
    }

    async fn complete_active(
        &self,
        username: &str,
        clock_out: NaiveDateTime,
    ) -> DomainResult<TimeEntry> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        lock_staff_row(&mut tx, username).await?;

        let entry = sqlx::query_as::<_, TimeEntry>(
            r#"
            UPDATE time_entries
            SET clock_out = $1, status = $2
            WHERE username = $3 AND status = $4
            RETURNING id, username, shift_id, clock_in, clock_out, status
            "#,
        )
        .bind(clock_out)
        .bind(TimeEntryStatus::Completed)
        .bind(username)
        .bind(TimeEntryStatus::Active)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::NotFound("No active clock-in record found".to_string()))?;

        credit_hours(&mut tx, username, entry.hours_worked()).await?;

        tx.commit().await.map_err(db_err)?;

        Ok(entry)
    }

    async fn complete_if_active(
        &self,
        entry_id: i32,
        clock_out: NaiveDateTime,
    ) -> DomainResult<Option<TimeEntry>> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let entry = sqlx::query_as::<_, TimeEntry>(
            r#"
            UPDATE time_entries
            SET clock_out = $1, status = $2
            WHERE id = $3 AND status = $4
            RETURNING id, username, shift_id, clock_in, clock_out, status
            "#,
        )
        .bind(clock_out)
        .bind(TimeEntryStatus::Completed)
        .bind(entry_id)
        .bind(TimeEntryStatus::Active)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;

        if let Some(entry) = &entry {
            credit_hours(&mut tx, &entry.username, entry.hours_worked()).await?;
        }

        tx.commit().await.map_err(db_err)?;

        Ok(entry)
    }

    async fn insert_absent(
        &self,
        username: &str,
        shift_id: i32,
        clock_in: NaiveDateTime,
    ) -> DomainResult<TimeEntry> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        lock_staff_row(&mut tx, username).await?;

        let existing = sqlx::query_scalar::<_, i32>(
            "SELECT 1 FROM time_entries WHERE username = $1 AND shift_id = $2",
        )
        .bind(username)
        .bind(shift_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;
        if existing.is_some() {
            return Err(DomainError::Conflict(
                "A time entry already exists for this shift".to_string(),
            ));
        }

        let entry = sqlx::query_as::<_, TimeEntry>(
            r#"
            INSERT INTO time_entries (username, shift_id, clock_in, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, shift_id, clock_in, clock_out, status
            "#,
        )
        .bind(username)
        .bind(shift_id)
        .bind(clock_in)
        .bind(TimeEntryStatus::Absent)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(entry)
    }

    async fn list_active_with_shifts(&self) -> DomainResult<Vec<(TimeEntry, Option<Shift>)>> {
        let entries = sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, username, shift_id, clock_in, clock_out, status
            FROM time_entries
            WHERE status = $1
            ORDER BY clock_in
            "#,
        )
        .bind(TimeEntryStatus::Active)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let shift_ids: Vec<i32> = entries.iter().filter_map(|entry| entry.shift_id).collect();
        let shifts = self.shifts_by_ids(&shift_ids).await?;

        Ok(Self::pair_with_shifts(entries, shifts))
    }

    async fn list_active_with_shifts_for_staff(
        &self,
        username: &str,
    ) -> DomainResult<Vec<(TimeEntry, Option<Shift>)>> {
        let entries = sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, username, shift_id, clock_in, clock_out, status
            FROM time_entries
            WHERE username = $1 AND status = $2
            ORDER BY clock_in
            "#,
        )
        .bind(username)
        .bind(TimeEntryStatus::Active)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let shift_ids: Vec<i32> = entries.iter().filter_map(|entry| entry.shift_id).collect();
        let shifts = self.shifts_by_ids(&shift_ids).await?;

        Ok(Self::pair_with_shifts(entries, shifts))
    }

    async fn list_for_staff(&self, username: &str) -> DomainResult<Vec<TimeEntry>> {
        let entries = sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, username, shift_id, clock_in, clock_out, status
            FROM time_entries
            WHERE username = $1
            ORDER BY clock_in
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(entries)
    }

    async fn list_recent_with_shifts(
        &self,
        username: &str,
        limit: i64,
    ) -> DomainResult<Vec<(TimeEntry, Option<Shift>)>> {
        let entries = sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, username, shift_id, clock_in, clock_out, status
            FROM time_entries
            WHERE username = $1
            ORDER BY clock_in DESC
            LIMIT $2
            "#,
        )
        .bind(username)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let shift_ids: Vec<i32> = entries.iter().filter_map(|entry| entry.shift_id).collect();
        let shifts = self.shifts_by_ids(&shift_ids).await?;

        Ok(Self::pair_with_shifts(entries, shifts))
    }

    async fn find_for_shift(
        &self,
        username: &str,
        shift_id: i32,
    ) -> DomainResult<Option<TimeEntry>> {
        let entry = sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, username, shift_id, clock_in, clock_out, status
            FROM time_entries
            WHERE username = $1 AND shift_id = $2
            "#,
        )
        .bind(username)
        .bind(shift_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(entry)
    }
}
