//! Serializers for the volunteer dashboard and time-tracking snapshot.

use chrono::NaiveDateTime;
use serde::Serialize;
use shared::Degree;
use utoipa::ToSchema;

use crate::domain::entities::{Shift, Student};
use crate::domain::services::{
    AttendanceStats, DayDistribution, ShiftHistoryEntry, TodayShift, TodayShiftStatus,
};
use crate::presentation::schedule_grid::ScheduleGrid;

#[derive(Debug, Serialize, ToSchema)]
pub struct VolunteerStudent {
    pub username: String,
    pub display_name: String,
    pub degree: Degree,
}

impl From<&Student> for VolunteerStudent {
    fn from(student: &Student) -> Self {
        Self {
            username: student.username.clone(),
            display_name: student.display_name().to_string(),
            degree: student.degree,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NextShift {
    pub status: String,
    pub date_label: Option<String>,
    pub time_range: Option<String>,
    pub starts_now: bool,
    pub time_until_label: Option<String>,
    pub is_scheduled: bool,
}

impl NextShift {
    pub fn none() -> Self {
        Self {
            status: "none".to_string(),
            date_label: None,
            time_range: None,
            starts_now: false,
            time_until_label: None,
            is_scheduled: false,
        }
    }

    /// Today's shift when there is one, else the first upcoming allocation.
    pub fn build(today: &TodayShift, upcoming: &[Shift], now: NaiveDateTime) -> Self {
        match today.status {
            TodayShiftStatus::Active | TodayShiftStatus::Future => Self {
                status: status_label(today.status).to_string(),
                date_label: Some(now.format("%A, %d %b").to_string()),
                time_range: today.time_range.clone(),
                starts_now: today.starts_now,
                time_until_label: today.time_until.clone(),
                is_scheduled: true,
            },
            _ => match upcoming.iter().find(|shift| shift.end_time > now) {
                Some(shift) => Self {
                    status: "upcoming".to_string(),
                    date_label: Some(shift.date.format("%A, %d %b").to_string()),
                    time_range: Some(shift.formatted_time()),
                    starts_now: false,
                    time_until_label: None,
                    is_scheduled: true,
                },
                None => Self::none(),
            },
        }
    }
}

fn status_label(status: TodayShiftStatus) -> &'static str {
    match status {
        TodayShiftStatus::None => "none",
        TodayShiftStatus::Future => "future",
        TodayShiftStatus::Active => "active",
        TodayShiftStatus::Completed => "completed",
        TodayShiftStatus::Error => "error",
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpcomingShift {
    pub date_label: String,
    pub time_range: String,
}

impl From<&Shift> for UpcomingShift {
    fn from(shift: &Shift) -> Self {
        Self {
            date_label: shift.date.format("%a, %d %b").to_string(),
            time_range: shift.formatted_time(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VolunteerDashboard {
    pub student: VolunteerStudent,
    pub next_shift: NextShift,
    pub upcoming_shifts: Vec<UpcomingShift>,
    pub schedule: ScheduleGrid,
    pub generated_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActionGate {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled_reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimeTrackingActions {
    pub clock_in: ActionGate,
    pub clock_out: ActionGate,
    pub auto_clock_out_enabled: bool,
}

impl TimeTrackingActions {
    /// Gate the clock buttons from today's shift state.
    pub fn from_today_shift(today: &TodayShift) -> Self {
        let can_clock_in = today.status == TodayShiftStatus::Active && !today.starts_now;
        let can_clock_out = today.status == TodayShiftStatus::Active && today.starts_now;

        let clock_in_reason = match today.status {
            TodayShiftStatus::None | TodayShiftStatus::Error => {
                Some("No active shift scheduled today.".to_string())
            }
            TodayShiftStatus::Future => Some("Shift has not started yet.".to_string()),
            TodayShiftStatus::Completed => {
                Some("Today's shift is already completed.".to_string())
            }
            TodayShiftStatus::Active => None,
        };

        let clock_out_reason = if can_clock_out {
            None
        } else if today.status == TodayShiftStatus::Active {
            Some("You must clock in before clocking out.".to_string())
        } else {
            clock_in_reason.clone()
        };

        Self {
            clock_in: ActionGate {
                allowed: can_clock_in,
                disabled_reason: if can_clock_in { None } else { clock_in_reason },
            },
            clock_out: ActionGate {
                allowed: can_clock_out,
                disabled_reason: clock_out_reason,
            },
            auto_clock_out_enabled: true,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimeTrackingSnapshot {
    pub today_shift: TodayShift,
    pub actions: TimeTrackingActions,
    pub stats: AttendanceStats,
    pub weekly_distribution: Vec<DayDistribution>,
    pub recent_shifts: Vec<ShiftHistoryEntry>,
    pub generated_at: String,
}
