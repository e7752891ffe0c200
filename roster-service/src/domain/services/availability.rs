//! Availability resolver.
//!
//! Decides whether a staff member is eligible for a (day, hour) slot.
//! Lookups go through a short-TTL Redis cache when one is configured; the
//! authoritative check always happens inside the write transaction of the
//! mutation that depends on it.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use shared::{
    cache_keys, cache_ttl, get_cached, set_cached, DomainError, DomainResult, RedisPool,
    ScheduleKind,
};
use utoipa::ToSchema;

use crate::domain::entities::Availability;
use crate::domain::repositories::{AvailabilityRepository, ScheduleRepository, StaffRepository};
use crate::domain::timeslot::{parse_day_label, parse_time_slot};

pub const ERROR_STAFF_NOT_FOUND: &str = "Staff member not found.";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailabilityWindow {
    pub start_time: String,
    pub end_time: String,
}

impl From<&Availability> for AvailabilityWindow {
    fn from(availability: &Availability) -> Self {
        Self {
            start_time: availability.start_time.format("%H:%M").to_string(),
            end_time: availability.end_time.format("%H:%M").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailableStaff {
    pub username: String,
    pub name: String,
    pub availability: Vec<AvailabilityWindow>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailabilityCheck {
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_slot: Option<AvailabilityWindow>,
    /// Whether the staff member already holds an allocation on the primary
    /// schedule at this day/hour. Information only.
    pub existing_assignment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchAvailabilityResult {
    pub staff_id: String,
    pub day: String,
    pub time: String,
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BatchAvailabilityQuery {
    pub staff_id: String,
    pub day: String,
    pub time: String,
}

pub struct AvailabilityService {
    staff_repo: Arc<dyn StaffRepository>,
    availability_repo: Arc<dyn AvailabilityRepository>,
    schedule_repo: Arc<dyn ScheduleRepository>,
    redis: Option<RedisPool>,
}

impl AvailabilityService {
    pub fn new(
        staff_repo: Arc<dyn StaffRepository>,
        availability_repo: Arc<dyn AvailabilityRepository>,
        schedule_repo: Arc<dyn ScheduleRepository>,
        redis: Option<RedisPool>,
    ) -> Self {
        Self {
            staff_repo,
            availability_repo,
            schedule_repo,
            redis,
        }
    }

    /// Active assistants of the pool whose availability covers (day, hour).
    pub async fn list_available(
        &self,
        kind: ScheduleKind,
        day_label: &str,
        time_slot: &str,
    ) -> DomainResult<Vec<AvailableStaff>> {
        let day = parse_day_label(day_label)?;
        let hour = parse_time_slot(time_slot, kind)?;

        let pool = self.active_pool(kind).await?;
        let windows = self.availability_repo.list_for_day(day).await?;

        let mut covered: Vec<&str> = windows
            .iter()
            .filter(|window| window.covers_hour(hour) && pool.contains(&window.username))
            .map(|window| window.username.as_str())
            .collect();
        covered.sort();
        covered.dedup();

        let usernames: Vec<String> = covered.iter().map(|s| s.to_string()).collect();
        let students = self.staff_repo.find_students(&usernames).await?;

        let mut result = Vec::with_capacity(usernames.len());
        for student in students {
            let staff_windows: Vec<AvailabilityWindow> = windows
                .iter()
                .filter(|window| window.username == student.username)
                .map(AvailabilityWindow::from)
                .collect();
            result.push(AvailableStaff {
                name: student.display_name().to_string(),
                username: student.username,
                availability: staff_windows,
            });
        }

        Ok(result)
    }

    /// Single-staff availability check.
    pub async fn is_available(
        &self,
        kind: ScheduleKind,
        username: &str,
        day_label: &str,
        time_slot: &str,
    ) -> DomainResult<AvailabilityCheck> {
        let day = parse_day_label(day_label)?;
        let hour = parse_time_slot(time_slot, kind)?;

        if !self.staff_exists(kind, username).await? {
            return Err(DomainError::NotFound(ERROR_STAFF_NOT_FOUND.to_string()));
        }
        if !self.staff_active(kind, username).await? {
            return Ok(AvailabilityCheck {
                is_available: false,
                matched_slot: None,
                existing_assignment: false,
                reason: Some("Staff member is inactive".to_string()),
            });
        }

        let windows = self
            .availability_repo
            .list_for_staff_on_day(username, day)
            .await?;
        let matched = windows.iter().find(|window| window.covers_hour(hour));

        let existing_assignment = self
            .schedule_repo
            .has_allocation_at(kind.primary_id(), username, day, hour)
            .await?;

        let check = AvailabilityCheck {
            is_available: matched.is_some(),
            matched_slot: matched.map(AvailabilityWindow::from),
            existing_assignment,
            reason: None,
        };

        self.cache_put(kind, username, day, hour, check.is_available)
            .await;

        Ok(check)
    }

    /// Evaluate many queries in one call. Per-entry failures are folded
    /// into `is_available = false` with the error attached.
    pub async fn batch_available(
        &self,
        kind: ScheduleKind,
        queries: Vec<BatchAvailabilityQuery>,
    ) -> DomainResult<Vec<BatchAvailabilityResult>> {
        let mut results = Vec::with_capacity(queries.len());

        for query in queries {
            let cached = self.cache_lookup(kind, &query).await;
            let outcome = match cached {
                Some(is_available) => Ok(is_available),
                None => self
                    .is_available(kind, &query.staff_id, &query.day, &query.time)
                    .await
                    .map(|check| check.is_available),
            };

            results.push(match outcome {
                Ok(is_available) => BatchAvailabilityResult {
                    staff_id: query.staff_id,
                    day: query.day,
                    time: query.time,
                    is_available,
                    error: None,
                },
                Err(error) => BatchAvailabilityResult {
                    staff_id: query.staff_id,
                    day: query.day,
                    time: query.time,
                    is_available: false,
                    error: Some(error.to_string()),
                },
            });
        }

        Ok(results)
    }

    async fn active_pool(&self, kind: ScheduleKind) -> DomainResult<HashSet<String>> {
        let pool = match kind {
            ScheduleKind::Helpdesk => self
                .staff_repo
                .list_active_help_desk_assistants()
                .await?
                .into_iter()
                .map(|assistant| assistant.username)
                .collect(),
            ScheduleKind::Lab => self
                .staff_repo
                .list_active_lab_assistants()
                .await?
                .into_iter()
                .map(|assistant| assistant.username)
                .collect(),
        };
        Ok(pool)
    }

    async fn staff_exists(&self, kind: ScheduleKind, username: &str) -> DomainResult<bool> {
        let exists = match kind {
            ScheduleKind::Helpdesk => self
                .staff_repo
                .find_help_desk_assistant(username)
                .await?
                .is_some(),
            ScheduleKind::Lab => self.staff_repo.find_lab_assistant(username).await?.is_some(),
        };
        Ok(exists)
    }

    async fn staff_active(&self, kind: ScheduleKind, username: &str) -> DomainResult<bool> {
        let active = match kind {
            ScheduleKind::Helpdesk => self
                .staff_repo
                .find_help_desk_assistant(username)
                .await?
                .map(|assistant| assistant.active)
                .unwrap_or(false),
            ScheduleKind::Lab => self
                .staff_repo
                .find_lab_assistant(username)
                .await?
                .map(|assistant| assistant.active)
                .unwrap_or(false),
        };
        Ok(active)
    }

    async fn cache_lookup(
        &self,
        kind: ScheduleKind,
        query: &BatchAvailabilityQuery,
    ) -> Option<bool> {
        let mut conn = self.redis.clone()?;
        let day = parse_day_label(&query.day).ok()?;
        let hour = parse_time_slot(&query.time, kind).ok()?;
        let key = cache_keys::availability(kind_label(kind), &query.staff_id, day as u32, hour);
        get_cached(&mut conn, &key).await
    }

    async fn cache_put(
        &self,
        kind: ScheduleKind,
        username: &str,
        day: i32,
        hour: u32,
        is_available: bool,
    ) {
        if let Some(mut conn) = self.redis.clone() {
            let key = cache_keys::availability(kind_label(kind), username, day as u32, hour);
            set_cached(&mut conn, &key, &is_available, cache_ttl::AVAILABILITY).await;
        }
    }
}

fn kind_label(kind: ScheduleKind) -> &'static str {
    match kind {
        ScheduleKind::Helpdesk => "helpdesk",
        ScheduleKind::Lab => "lab",
    }
}
