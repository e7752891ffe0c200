use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use shared::{DomainError, DomainResult, ScheduleKind};
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::entities::{Allocation, Schedule, Shift, ShiftCourseDemand};
use crate::domain::repositories::{NewShift, SavedSlot, ScheduleRepository, ScheduleStats};

pub struct PostgresScheduleRepository {
    pool: PgPool,
}

impl PostgresScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(e: sqlx::Error) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Availability must cover the shift's whole window on its weekday.
/// Runs inside the caller's transaction so the check is authoritative.
async fn availability_covers(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
    shift: &Shift,
) -> DomainResult<bool> {
    let day_of_week = shift.date.weekday().num_days_from_monday() as i32;

    let covered = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT 1
        FROM availabilities
        WHERE username = $1
          AND day_of_week = $2
          AND start_time <= $3
          AND end_time >= $4
        LIMIT 1
        "#,
    )
    .bind(username)
    .bind(day_of_week)
    .bind(shift.start_time.time())
    .bind(shift.end_time.time())
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_err)?;

    Ok(covered.is_some())
}

async fn student_exists(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
) -> DomainResult<bool> {
    let found = sqlx::query_scalar::<_, i32>("SELECT 1 FROM students WHERE username = $1")
        .bind(username)
        .fetch_optional(&mut **tx)
        .await
        .map_err(db_err)?;

    Ok(found.is_some())
}

#[async_trait]
impl ScheduleRepository for PostgresScheduleRepository {
    async fn find_schedule(&self, id: i32) -> DomainResult<Option<Schedule>> {
        let schedule = sqlx::query_as::<_, Schedule>(
            r#"
            SELECT id, start_date, end_date, kind, generated_at, is_published
            FROM schedules
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(schedule)
    }

    async fn upsert_primary_schedule(
        &self,
        kind: ScheduleKind,
        start_date: NaiveDate,
        end_date: NaiveDate,
        generated_at: NaiveDateTime,
    ) -> DomainResult<Schedule> {
        let schedule = sqlx::query_as::<_, Schedule>(
            r#"
            INSERT INTO schedules (id, start_date, end_date, kind, generated_at, is_published)
            VALUES ($1, $2, $3, $4, $5, FALSE)
            ON CONFLICT (id) DO UPDATE
                SET start_date = EXCLUDED.start_date,
                    end_date = EXCLUDED.end_date,
                    generated_at = EXCLUDED.generated_at
            RETURNING id, start_date, end_date, kind, generated_at, is_published
            "#,
        )
        .bind(kind.primary_id())
        .bind(start_date)
        .bind(end_date)
        .bind(kind)
        .bind(generated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(schedule)
    }

    async fn replace_window(
        &self,
        schedule_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        shifts: Vec<NewShift>,
        created_at: NaiveDateTime,
    ) -> DomainResult<(u64, u64)> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Shifts cascade to demands and allocations.
        sqlx::query(
            r#"
            DELETE FROM shifts
            WHERE schedule_id = $1 AND date >= $2 AND date <= $3
            "#,
        )
        .bind(schedule_id)
        .bind(start_date)
        .bind(end_date)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        let mut shifts_created = 0u64;
        let mut assignments_created = 0u64;

        for new_shift in shifts {
            let shift_id: i32 = sqlx::query_scalar(
                r#"
                INSERT INTO shifts (date, start_time, end_time, schedule_id)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(new_shift.date)
            .bind(new_shift.start_time)
            .bind(new_shift.end_time)
            .bind(schedule_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?;
            shifts_created += 1;

            for demand in &new_shift.demands {
                sqlx::query(
                    r#"
                    INSERT INTO shift_course_demands (shift_id, course_code, tutors_required, weight)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(shift_id)
                .bind(&demand.course_code)
                .bind(demand.tutors_required)
                .bind(demand.weight)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            }

            for username in &new_shift.assigned {
                sqlx::query(
                    r#"
                    INSERT INTO allocations (username, shift_id, schedule_id, created_at)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(username)
                .bind(shift_id)
                .bind(schedule_id)
                .bind(created_at)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
                assignments_created += 1;
            }
        }

        tx.commit().await.map_err(db_err)?;

        Ok((shifts_created, assignments_created))
    }

    async fn clear_schedule(&self, schedule_id: i32) -> DomainResult<(u64, u64)> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let allocations = sqlx::query("DELETE FROM allocations WHERE schedule_id = $1")
            .bind(schedule_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?
            .rows_affected();

        let shifts = sqlx::query("DELETE FROM shifts WHERE schedule_id = $1")
            .bind(schedule_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?
            .rows_affected();

        sqlx::query("UPDATE schedules SET is_published = FALSE WHERE id = $1")
            .bind(schedule_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok((shifts, allocations))
    }

    async fn mark_published(&self, schedule_id: i32) -> DomainResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE schedules
            SET is_published = TRUE
            WHERE id = $1 AND is_published = FALSE
            "#,
        )
        .bind(schedule_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() == 1)
    }

    async fn distinct_allocated_usernames(&self, schedule_id: i32) -> DomainResult<Vec<String>> {
        let usernames: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT username
            FROM allocations
            WHERE schedule_id = $1
            ORDER BY username
            "#,
        )
        .bind(schedule_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(usernames)
    }

    async fn list_shifts(&self, schedule_id: i32) -> DomainResult<Vec<Shift>> {
        let shifts = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, date, start_time, end_time, schedule_id
            FROM shifts
            WHERE schedule_id = $1
            ORDER BY date, start_time
            "#,
        )
        .bind(schedule_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(shifts)
    }

    async fn find_shift(&self, shift_id: i32) -> DomainResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, date, start_time, end_time, schedule_id
            FROM shifts
            WHERE id = $1
            "#,
        )
        .bind(shift_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(shift)
    }

    async fn find_shift_by_start(
        &self,
        schedule_id: i32,
        start_time: NaiveDateTime,
    ) -> DomainResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, date, start_time, end_time, schedule_id
            FROM shifts
            WHERE schedule_id = $1 AND start_time = $2
            "#,
        )
        .bind(schedule_id)
        .bind(start_time)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(shift)
    }

    async fn list_demands_for_shift(&self, shift_id: i32) -> DomainResult<Vec<ShiftCourseDemand>> {
        let demands = sqlx::query_as::<_, ShiftCourseDemand>(
            r#"
            SELECT id, shift_id, course_code, tutors_required, weight
            FROM shift_course_demands
            WHERE shift_id = $1
            ORDER BY course_code
            "#,
        )
        .bind(shift_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(demands)
    }

    async fn list_allocations_for_shift(&self, shift_id: i32) -> DomainResult<Vec<Allocation>> {
        let allocations = sqlx::query_as::<_, Allocation>(
            r#"
            SELECT id, username, shift_id, schedule_id, created_at
            FROM allocations
            WHERE shift_id = $1
            ORDER BY username
            "#,
        )
        .bind(shift_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(allocations)
    }

    async fn list_allocations_for_schedule(
        &self,
        schedule_id: i32,
    ) -> DomainResult<Vec<Allocation>> {
        let allocations = sqlx::query_as::<_, Allocation>(
            r#"
            SELECT id, username, shift_id, schedule_id, created_at
            FROM allocations
            WHERE schedule_id = $1
            ORDER BY shift_id, username
            "#,
        )
        .bind(schedule_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(allocations)
    }

    async fn find_allocation(
        &self,
        shift_id: i32,
        username: &str,
    ) -> DomainResult<Option<Allocation>> {
        let allocation = sqlx::query_as::<_, Allocation>(
            r#"
            SELECT id, username, shift_id, schedule_id, created_at
            FROM allocations
            WHERE shift_id = $1 AND username = $2
            "#,
        )
        .bind(shift_id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(allocation)
    }

    async fn insert_allocation(
        &self,
        shift_id: i32,
        username: &str,
        created_at: NaiveDateTime,
    ) -> DomainResult<Allocation> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Lock the parent shift to serialize concurrent inserts for the
        // same slot; the unique constraint is the second line of defense.
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, date, start_time, end_time, schedule_id
            FROM shifts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(shift_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::NotFound("Shift not found.".to_string()))?;

        if !student_exists(&mut tx, username).await? {
            return Err(DomainError::NotFound("Staff member not found.".to_string()));
        }

        let duplicate = sqlx::query_scalar::<_, i32>(
            "SELECT 1 FROM allocations WHERE shift_id = $1 AND username = $2",
        )
        .bind(shift_id)
        .bind(username)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err)?;
        if duplicate.is_some() {
            return Err(DomainError::Conflict(
                "Staff member is already allocated to this shift".to_string(),
            ));
        }

        if !availability_covers(&mut tx, username, &shift).await? {
            return Err(DomainError::FailedPrecondition(
                "Availability does not cover this shift".to_string(),
            ));
        }

        let allocation = sqlx::query_as::<_, Allocation>(
            r#"
            INSERT INTO allocations (username, shift_id, schedule_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, shift_id, schedule_id, created_at
            "#,
        )
        .bind(username)
        .bind(shift_id)
        .bind(shift.schedule_id)
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(allocation)
    }

    async fn delete_allocation(&self, shift_id: i32, username: &str) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM allocations WHERE shift_id = $1 AND username = $2")
            .bind(shift_id)
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(
                "Staff assignment not found for the specified shift.".to_string(),
            ));
        }

        Ok(())
    }

    async fn save_grid(
        &self,
        schedule_id: i32,
        _kind: ScheduleKind,
        start_date: NaiveDate,
        end_date: NaiveDate,
        slots: Vec<SavedSlot>,
        created_at: NaiveDateTime,
    ) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            r#"
            DELETE FROM allocations
            WHERE schedule_id = $1
              AND shift_id IN (
                  SELECT id FROM shifts
                  WHERE schedule_id = $1 AND date >= $2 AND date <= $3
              )
            "#,
        )
        .bind(schedule_id)
        .bind(start_date)
        .bind(end_date)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        for slot in slots {
            let existing = sqlx::query_as::<_, Shift>(
                r#"
                SELECT id, date, start_time, end_time, schedule_id
                FROM shifts
                WHERE schedule_id = $1 AND start_time = $2
                FOR UPDATE
                "#,
            )
            .bind(schedule_id)
            .bind(slot.start_time)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err)?;

            let shift = match existing {
                Some(shift) => {
                    sqlx::query("UPDATE shifts SET end_time = $1 WHERE id = $2")
                        .bind(slot.end_time)
                        .bind(shift.id)
                        .execute(&mut *tx)
                        .await
                        .map_err(db_err)?;
                    Shift {
                        end_time: slot.end_time,
                        ..shift
                    }
                }
                None => sqlx::query_as::<_, Shift>(
                    r#"
                    INSERT INTO shifts (date, start_time, end_time, schedule_id)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, date, start_time, end_time, schedule_id
                    "#,
                )
                .bind(slot.date)
                .bind(slot.start_time)
                .bind(slot.end_time)
                .bind(schedule_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_err)?,
            };

            for username in &slot.usernames {
                if !student_exists(&mut tx, username).await? {
                    return Err(DomainError::NotFound(format!(
                        "Staff member {} not found",
                        username
                    )));
                }
                if !availability_covers(&mut tx, username, &shift).await? {
                    return Err(DomainError::FailedPrecondition(format!(
                        "Availability of {} does not cover the {} shift",
                        username,
                        shift.formatted_time()
                    )));
                }

                // Duplicate usernames inside one slot collapse silently.
                sqlx::query(
                    r#"
                    INSERT INTO allocations (username, shift_id, schedule_id, created_at)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (shift_id, username) DO NOTHING
                    "#,
                )
                .bind(username)
                .bind(shift.id)
                .bind(schedule_id)
                .bind(created_at)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            }
        }

        tx.commit().await.map_err(db_err)?;

        Ok(())
    }

    async fn has_allocation_at(
        &self,
        schedule_id: i32,
        username: &str,
        day_of_week: i32,
        hour: u32,
    ) -> DomainResult<bool> {
        let found = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT 1
            FROM allocations a
            JOIN shifts s ON s.id = a.shift_id
            WHERE a.username = $1
              AND s.schedule_id = $2
              AND EXTRACT(ISODOW FROM s.date)::int - 1 = $3
              AND EXTRACT(HOUR FROM s.start_time)::int = $4
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(schedule_id)
        .bind(day_of_week)
        .bind(hour as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(found.is_some())
    }

    async fn shifts_for_staff_between(
        &self,
        username: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DomainResult<Vec<Shift>> {
        let shifts = sqlx::query_as::<_, Shift>(
            r#"
            SELECT s.id, s.date, s.start_time, s.end_time, s.schedule_id
            FROM shifts s
            JOIN allocations a ON a.shift_id = s.id
            WHERE a.username = $1 AND s.date >= $2 AND s.date <= $3
            ORDER BY s.date, s.start_time
            "#,
        )
        .bind(username)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(shifts)
    }

    async fn summary_stats(&self, schedule_id: i32) -> DomainResult<ScheduleStats> {
        let total_shifts: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM shifts WHERE schedule_id = $1")
                .bind(schedule_id)
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;

        let assigned_shifts: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT shift_id)
            FROM allocations
            WHERE schedule_id = $1
            "#,
        )
        .bind(schedule_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        let total_assignments: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM allocations WHERE schedule_id = $1")
                .bind(schedule_id)
                .fetch_one(&self.pool)
                .await
                .map_err(db_err)?;

        Ok(ScheduleStats {
            total_shifts,
            assigned_shifts,
            total_assignments,
        })
    }
}
