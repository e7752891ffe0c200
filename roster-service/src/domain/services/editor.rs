//! Non-generative schedule mutations: bulk grid saves, single allocation
//! add/remove, and publishing. Every mutation is one transaction; partial
//! success is not permitted.

use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use shared::{
    cache_keys, invalidate_cache, Clock, DomainError, DomainResult, RedisPool, ScheduleKind,
};
use utoipa::ToSchema;

use crate::domain::entities::Allocation;
use crate::domain::repositories::{SavedSlot, ScheduleRepository};
use crate::domain::services::Notifier;
use crate::domain::timeslot::{parse_day_label, parse_time_slot, shift_end_hour};

pub const ERROR_SCHEDULE_NOT_FOUND: &str = "Schedule not found.";
pub const ERROR_SHIFT_NOT_FOUND: &str = "Shift not found.";

/// One grid cell of a bulk save request.
#[derive(Debug, Clone)]
pub struct AssignmentSlotInput {
    pub day: String,
    pub time: String,
    pub staff: Vec<String>,
}

/// Locates a shift either directly or through its grid position.
#[derive(Debug, Clone, Default)]
pub struct ShiftLocator {
    pub shift_id: Option<i32>,
    pub day: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PublishReport {
    pub status: String,
    pub message: String,
}

pub struct ScheduleEditor {
    schedule_repo: Arc<dyn ScheduleRepository>,
    notifier: Arc<Notifier>,
    clock: Arc<dyn Clock>,
    redis: Option<RedisPool>,
}

impl ScheduleEditor {
    pub fn new(
        schedule_repo: Arc<dyn ScheduleRepository>,
        notifier: Arc<Notifier>,
        clock: Arc<dyn Clock>,
        redis: Option<RedisPool>,
    ) -> Self {
        Self {
            schedule_repo,
            notifier,
            clock,
            redis,
        }
    }

    /// Bulk save of a full grid for [start, end].
    pub async fn save_assignments(
        &self,
        kind: ScheduleKind,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
        slots: Vec<AssignmentSlotInput>,
    ) -> DomainResult<()> {
        if start_date > end_date {
            return Err(DomainError::InvalidInput(
                "start_date must not be after end_date".to_string(),
            ));
        }

        let now = self.clock.now();
        let schedule = self
            .schedule_repo
            .upsert_primary_schedule(kind, start_date, end_date, now)
            .await?;

        let mut resolved = Vec::with_capacity(slots.len());
        for slot in slots {
            let day = parse_day_label(&slot.day)?;
            let hour = parse_time_slot(&slot.time, kind)?;

            let date = start_date + Duration::days(day as i64);
            if date > end_date {
                return Err(DomainError::InvalidInput(format!(
                    "Assignment for {} falls outside the schedule window",
                    slot.day
                )));
            }

            let start_time = date
                .and_hms_opt(hour, 0, 0)
                .ok_or_else(|| DomainError::InvalidInput("Invalid shift hour".to_string()))?;
            let end_time = date
                .and_hms_opt(0, 0, 0)
                .expect("midnight is valid")
                + Duration::hours(shift_end_hour(kind, hour) as i64);

            resolved.push(SavedSlot {
                date,
                start_time,
                end_time,
                usernames: slot.staff,
            });
        }

        self.schedule_repo
            .save_grid(schedule.id, kind, start_date, end_date, resolved, now)
            .await?;

        self.invalidate_grid(kind).await;
        tracing::info!(schedule_id = schedule.id, "Schedule assignments saved");

        Ok(())
    }

    /// Insert a single allocation for (shift, staff).
    pub async fn add_allocation(
        &self,
        kind: ScheduleKind,
        username: &str,
        shift_id: i32,
    ) -> DomainResult<Allocation> {
        let shift = self
            .schedule_repo
            .find_shift(shift_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(ERROR_SHIFT_NOT_FOUND.to_string()))?;

        if shift.schedule_id != kind.primary_id() {
            return Err(DomainError::NotFound(ERROR_SHIFT_NOT_FOUND.to_string()));
        }

        let allocation = self
            .schedule_repo
            .insert_allocation(shift_id, username, self.clock.now())
            .await?;

        self.invalidate_grid(kind).await;

        Ok(allocation)
    }

    /// Delete exactly one allocation, located by shift id or grid position.
    pub async fn remove_allocation(
        &self,
        kind: ScheduleKind,
        username: &str,
        locator: ShiftLocator,
    ) -> DomainResult<()> {
        let shift = match locator.shift_id {
            Some(shift_id) => self
                .schedule_repo
                .find_shift(shift_id)
                .await?
                .filter(|shift| shift.schedule_id == kind.primary_id()),
            None => {
                let schedule = self
                    .schedule_repo
                    .find_schedule(kind.primary_id())
                    .await?
                    .ok_or_else(|| DomainError::NotFound(ERROR_SCHEDULE_NOT_FOUND.to_string()))?;

                let day_label = locator.day.as_deref().ok_or_else(|| {
                    DomainError::InvalidInput("day or shift_id is required".to_string())
                })?;
                let time_slot = locator.time.as_deref().ok_or_else(|| {
                    DomainError::InvalidInput("time or shift_id is required".to_string())
                })?;

                let day = parse_day_label(day_label)?;
                let hour = parse_time_slot(time_slot, kind)?;
                let date = schedule.start_date + Duration::days(day as i64);
                let start_time = date
                    .and_hms_opt(hour, 0, 0)
                    .ok_or_else(|| DomainError::InvalidInput("Invalid shift hour".to_string()))?;

                self.schedule_repo
                    .find_shift_by_start(schedule.id, start_time)
                    .await?
            }
        };

        let shift =
            shift.ok_or_else(|| DomainError::NotFound(ERROR_SHIFT_NOT_FOUND.to_string()))?;

        self.schedule_repo
            .delete_allocation(shift.id, username)
            .await?;

        self.invalidate_grid(kind).await;

        Ok(())
    }

    /// Publish a schedule and notify every allocated staff member once.
    /// Idempotent: a second call reports "already published" and emits
    /// nothing.
    pub async fn publish(&self, schedule_id: i32) -> DomainResult<PublishReport> {
        let schedule = self
            .schedule_repo
            .find_schedule(schedule_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(ERROR_SCHEDULE_NOT_FOUND.to_string()))?;

        let changed = self.schedule_repo.mark_published(schedule_id).await?;
        if !changed {
            return Ok(PublishReport {
                status: "error".to_string(),
                message: "Schedule is already published".to_string(),
            });
        }

        let date_range = schedule.formatted_date_range();
        let usernames = self
            .schedule_repo
            .distinct_allocated_usernames(schedule_id)
            .await?;
        for username in &usernames {
            self.notifier
                .schedule_published(username, Some(&date_range))
                .await;
        }

        self.invalidate_grid(schedule.kind).await;
        tracing::info!(schedule_id, notified = usernames.len(), "Schedule published");

        Ok(PublishReport {
            status: "success".to_string(),
            message: "Schedule published and notifications sent".to_string(),
        })
    }

    async fn invalidate_grid(&self, kind: ScheduleKind) {
        if let Some(mut conn) = self.redis.clone() {
            let label = match kind {
                ScheduleKind::Helpdesk => "helpdesk",
                ScheduleKind::Lab => "lab",
            };
            invalidate_cache(&mut conn, &cache_keys::schedule_grid(label)).await;
        }
    }
}
