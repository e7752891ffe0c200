//! Attendance engine: the clock-in/clock-out state machine, the
//! auto-completion sweep, and the derived per-staff queries.

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::Serialize;
use shared::{Clock, DomainError, DomainResult, TimeEntryStatus};
use utoipa::ToSchema;

use crate::domain::entities::Shift;
use crate::domain::repositories::{ScheduleRepository, TimeEntryRepository};
use crate::domain::services::Notifier;

pub const ERROR_SHIFT_NOT_FOUND: &str = "Shift not found.";
pub const ERROR_ACTIVE_ENTRY_EXISTS: &str = "You already have an active clock-in record";
pub const ERROR_NO_ACTIVE_ENTRY: &str = "No active clock-in record found";

#[derive(Debug, Serialize, ToSchema)]
pub struct ClockInResult {
    pub time_entry_id: i32,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClockOutResult {
    pub time_entry_id: i32,
    pub hours_worked: f64,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TodayShiftStatus {
    None,
    Future,
    Active,
    Completed,
    Error,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TodayShift {
    pub status: TodayShiftStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,
    /// True when the staff member holds an open active entry on this shift
    pub starts_now: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_until: Option<String>,
}

impl TodayShift {
    pub fn none() -> Self {
        Self {
            status: TodayShiftStatus::None,
            shift_id: None,
            time_range: None,
            starts_now: false,
            time_until: None,
        }
    }

    pub fn error() -> Self {
        Self {
            status: TodayShiftStatus::Error,
            ..Self::none()
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsWindow {
    pub hours: f64,
    pub date_range: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceStats {
    pub daily: StatsWindow,
    pub weekly: StatsWindow,
    pub monthly: StatsWindow,
    pub semester: StatsWindow,
    pub absences: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShiftHistoryEntry {
    pub date: String,
    pub day: String,
    pub time_range: String,
    pub status: TimeEntryStatus,
    pub hours: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DayDistribution {
    pub label: String,
    pub hours: f64,
    pub percentage: u32,
}

pub struct AttendanceService {
    time_repo: Arc<dyn TimeEntryRepository>,
    schedule_repo: Arc<dyn ScheduleRepository>,
    notifier: Arc<Notifier>,
    clock: Arc<dyn Clock>,
    /// How long before a shift starts clocking in opens up
    early_window: Duration,
    /// Ceiling on shiftless sessions before the sweep closes them
    max_session: Duration,
}

impl AttendanceService {
    pub fn new(
        time_repo: Arc<dyn TimeEntryRepository>,
        schedule_repo: Arc<dyn ScheduleRepository>,
        notifier: Arc<Notifier>,
        clock: Arc<dyn Clock>,
        early_window_minutes: i64,
        max_session_hours: i64,
    ) -> Self {
        Self {
            time_repo,
            schedule_repo,
            notifier,
            clock,
            early_window: Duration::minutes(early_window_minutes),
            max_session: Duration::hours(max_session_hours),
        }
    }

    /// Clock a staff member in, against a specific shift or today's
    /// covering allocation. Without either, an unscheduled session opens.
    pub async fn clock_in(
        &self,
        username: &str,
        shift_id: Option<i32>,
    ) -> DomainResult<ClockInResult> {
        if self.time_repo.find_active(username).await?.is_some() {
            return Err(DomainError::Conflict(ERROR_ACTIVE_ENTRY_EXISTS.to_string()));
        }

        let now = self.clock.now();
        let shift = match shift_id {
            Some(id) => Some(
                self.schedule_repo
                    .find_shift(id)
                    .await?
                    .ok_or_else(|| DomainError::NotFound(ERROR_SHIFT_NOT_FOUND.to_string()))?,
            ),
            None => self.covering_shift_today(username, now).await?,
        };

        if let Some(shift) = &shift {
            if now < shift.start_time - self.early_window {
                return Err(DomainError::FailedPrecondition(
                    "Too early to clock in for this shift".to_string(),
                ));
            }
            if now >= shift.end_time {
                return Err(DomainError::FailedPrecondition(
                    "This shift has already ended".to_string(),
                ));
            }
        }

        let entry = self
            .time_repo
            .insert_active(username, shift.as_ref().map(|s| s.id), now)
            .await?;

        let details = shift
            .map(|s| s.formatted_time())
            .unwrap_or_else(|| format!("{} shift", now.format("%I:%M %p")));
        self.notifier.clock_in(username, &details).await;

        Ok(ClockInResult {
            time_entry_id: entry.id,
            message: "Clocked in successfully".to_string(),
        })
    }

    /// Close the staff member's active entry. The ledger is credited with
    /// the time up to the shift end, never past it.
    pub async fn clock_out(&self, username: &str) -> DomainResult<ClockOutResult> {
        let entry = self
            .time_repo
            .find_active(username)
            .await?
            .ok_or_else(|| DomainError::NotFound(ERROR_NO_ACTIVE_ENTRY.to_string()))?;

        let now = self.clock.now();
        let shift = match entry.shift_id {
            Some(shift_id) => self.schedule_repo.find_shift(shift_id).await?,
            None => None,
        };
        let effective_out = match &shift {
            Some(shift) => now.min(shift.end_time),
            None => now,
        };

        let completed = self.time_repo.complete_active(username, effective_out).await?;

        let details = shift
            .map(|s| s.formatted_time())
            .unwrap_or_else(|| format!("{} shift", entry.clock_in.format("%I:%M %p")));
        self.notifier.clock_out(username, &details, false).await;

        Ok(ClockOutResult {
            time_entry_id: completed.id,
            hours_worked: completed.hours_worked(),
            message: "Clocked out successfully".to_string(),
        })
    }

    /// Record an absence for (staff, shift).
    pub async fn mark_missed(&self, username: &str, shift_id: i32) -> DomainResult<()> {
        let shift = self
            .schedule_repo
            .find_shift(shift_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(ERROR_SHIFT_NOT_FOUND.to_string()))?;

        self.time_repo
            .insert_absent(username, shift_id, shift.start_time)
            .await?;

        self.notifier
            .missed_shift(username, &shift.formatted_time())
            .await;

        Ok(())
    }

    /// Complete every abandoned active entry whose shift has ended (or,
    /// for unscheduled sessions, whose ceiling has passed). Idempotent.
    pub async fn auto_complete_sweep(&self) -> DomainResult<u64> {
        let entries = self.time_repo.list_active_with_shifts().await?;
        self.complete_abandoned(entries).await
    }

    /// Per-staff reconciliation, run before reading that staff member's
    /// attendance snapshot.
    pub async fn check_and_complete_abandoned(&self, username: &str) -> DomainResult<u64> {
        let entries = self
            .time_repo
            .list_active_with_shifts_for_staff(username)
            .await?;
        self.complete_abandoned(entries).await
    }

    async fn complete_abandoned(
        &self,
        entries: Vec<(crate::domain::entities::TimeEntry, Option<Shift>)>,
    ) -> DomainResult<u64> {
        let now = self.clock.now();
        let mut completed = 0u64;

        for (entry, shift) in entries {
            let deadline = match &shift {
                Some(shift) => shift.end_time,
                None => entry.clock_in + self.max_session,
            };
            if deadline >= now {
                continue;
            }

            if let Some(closed) = self.time_repo.complete_if_active(entry.id, deadline).await? {
                let details = shift
                    .as_ref()
                    .map(|s| s.formatted_time())
                    .unwrap_or_else(|| format!("{} shift", entry.clock_in.format("%I:%M %p")));
                self.notifier.clock_out(&closed.username, &details, true).await;
                completed += 1;
            }
        }

        if completed > 0 {
            tracing::info!(completed, "Auto-completed abandoned time entries");
        }

        Ok(completed)
    }

    /// Snapshot of the staff member's shift situation today.
    pub async fn today_shift(&self, username: &str) -> DomainResult<TodayShift> {
        let now = self.clock.now();
        let today = now.date();

        let mut shifts = self
            .schedule_repo
            .shifts_for_staff_between(username, today, today)
            .await?;
        shifts.sort_by_key(|shift| shift.start_time);

        let active_entry = self.time_repo.find_active(username).await?;
        let mut completed_candidate: Option<Shift> = None;

        for shift in shifts {
            if now >= shift.end_time {
                let entry = self.time_repo.find_for_shift(username, shift.id).await?;
                if entry
                    .map(|e| e.status == TimeEntryStatus::Completed)
                    .unwrap_or(false)
                {
                    completed_candidate = Some(shift);
                }
                continue;
            }

            if now >= shift.start_time - self.early_window {
                let starts_now = active_entry
                    .as_ref()
                    .map(|entry| entry.shift_id == Some(shift.id))
                    .unwrap_or(false);
                return Ok(TodayShift {
                    status: TodayShiftStatus::Active,
                    shift_id: Some(shift.id),
                    time_range: Some(shift.formatted_time()),
                    starts_now,
                    time_until: None,
                });
            }

            return Ok(TodayShift {
                status: TodayShiftStatus::Future,
                shift_id: Some(shift.id),
                time_range: Some(shift.formatted_time()),
                starts_now: false,
                time_until: Some(time_until_label(shift.start_time - now)),
            });
        }

        if let Some(shift) = completed_candidate {
            return Ok(TodayShift {
                status: TodayShiftStatus::Completed,
                shift_id: Some(shift.id),
                time_range: Some(shift.formatted_time()),
                starts_now: false,
                time_until: None,
            });
        }

        Ok(TodayShift::none())
    }

    /// Worked-hours aggregates. Weeks start Monday; months are calendar
    /// months in local time.
    pub async fn stats(&self, username: &str) -> DomainResult<AttendanceStats> {
        let entries = self.time_repo.list_for_staff(username).await?;
        let now = self.clock.now();

        let today_start = day_start(now);
        let week_start = today_start - Duration::days(now.date().weekday().num_days_from_monday() as i64);
        let month_start = now
            .date()
            .with_day(1)
            .expect("day one exists")
            .and_hms_opt(0, 0, 0)
            .expect("midnight is valid");

        let hours_since = |from: NaiveDateTime| -> f64 {
            entries
                .iter()
                .filter(|entry| entry.clock_in >= from)
                .map(|entry| entry.hours_worked())
                .sum()
        };

        let absences = entries
            .iter()
            .filter(|entry| entry.status == TimeEntryStatus::Absent)
            .count() as i64;

        Ok(AttendanceStats {
            daily: StatsWindow {
                hours: hours_since(today_start),
                date_range: today_start.format("%Y-%m-%d").to_string(),
            },
            weekly: StatsWindow {
                hours: hours_since(week_start),
                date_range: format!(
                    "{} - {}",
                    week_start.format("%Y-%m-%d"),
                    (week_start + Duration::days(6)).format("%Y-%m-%d")
                ),
            },
            monthly: StatsWindow {
                hours: hours_since(month_start),
                date_range: month_start.format("%B %Y").to_string(),
            },
            semester: StatsWindow {
                hours: entries.iter().map(|entry| entry.hours_worked()).sum(),
                date_range: "Current Semester".to_string(),
            },
            absences,
        })
    }

    /// Most recent entries, newest first.
    pub async fn shift_history(
        &self,
        username: &str,
        limit: i64,
    ) -> DomainResult<Vec<ShiftHistoryEntry>> {
        let entries = self.time_repo.list_recent_with_shifts(username, limit).await?;

        Ok(entries
            .into_iter()
            .map(|(entry, shift)| ShiftHistoryEntry {
                date: entry.clock_in.format("%Y-%m-%d").to_string(),
                day: entry.clock_in.format("%A").to_string(),
                time_range: shift
                    .map(|s| s.formatted_time())
                    .unwrap_or_else(|| entry.clock_in.format("%I:%M %p").to_string()),
                status: entry.status,
                hours: entry.hours_worked(),
            })
            .collect())
    }

    /// Per-weekday worked hours for UI plotting.
    pub async fn time_distribution(&self, username: &str) -> DomainResult<Vec<DayDistribution>> {
        let entries = self.time_repo.list_for_staff(username).await?;

        let mut per_day = [0.0f64; 7];
        for entry in &entries {
            let day = entry.clock_in.date().weekday().num_days_from_monday() as usize;
            per_day[day] += entry.hours_worked();
        }
        let total: f64 = per_day.iter().sum();

        const LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
        Ok(LABELS
            .iter()
            .zip(per_day.iter())
            .map(|(label, &hours)| DayDistribution {
                label: label.to_string(),
                hours: (hours * 100.0).round() / 100.0,
                percentage: if total > 0.0 {
                    ((hours / total) * 100.0).round() as u32
                } else {
                    0
                },
            })
            .collect())
    }

    async fn covering_shift_today(
        &self,
        username: &str,
        now: NaiveDateTime,
    ) -> DomainResult<Option<Shift>> {
        let today = now.date();
        let shifts = self
            .schedule_repo
            .shifts_for_staff_between(username, today, today)
            .await?;

        Ok(shifts
            .into_iter()
            .filter(|shift| now >= shift.start_time - self.early_window && now < shift.end_time)
            .min_by_key(|shift| shift.start_time))
    }
}

fn day_start(at: NaiveDateTime) -> NaiveDateTime {
    at.date().and_hms_opt(0, 0, 0).expect("midnight is valid")
}

fn time_until_label(until: Duration) -> String {
    let hours = until.num_hours();
    let minutes = until.num_minutes() % 60;

    if hours > 0 {
        if minutes > 0 {
            format!("{} hours {} minutes", hours, minutes)
        } else {
            format!("{} hours", hours)
        }
    } else {
        format!("{} minutes", minutes.max(0))
    }
}
