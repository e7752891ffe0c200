//! Read model for the schedule grid consumed by the admin editor and the
//! volunteer dashboard.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use shared::{
    cache_keys, cache_ttl, get_cached, set_cached, DomainResult, RedisPool, ScheduleKind,
};
use utoipa::ToSchema;

use crate::domain::entities::{Availability, Schedule, Shift, Student};
use crate::domain::repositories::{AvailabilityRepository, ScheduleRepository, StaffRepository};
use crate::domain::timeslot::{
    shift_end_hour, HELPDESK_FIRST_HOUR, HELPDESK_LAST_HOUR, LAB_BLOCK_START_HOURS,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GridStaff {
    pub username: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GridShift {
    pub shift_id: Option<i32>,
    pub time: String,
    pub hour: u32,
    pub date: String,
    pub assistants: Vec<GridStaff>,
    pub available_staff: Vec<GridStaff>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GridDay {
    pub day: String,
    pub day_code: String,
    pub date: String,
    pub shifts: Vec<GridShift>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleGrid {
    pub schedule_id: Option<i32>,
    pub date_range: String,
    pub is_published: bool,
    pub kind: ScheduleKind,
    pub days: Vec<GridDay>,
}

const DAY_NAMES: [&str; 6] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
const DAY_CODES: [&str; 6] = ["MON", "TUE", "WED", "THUR", "FRI", "SAT"];

fn operating_days(kind: ScheduleKind) -> usize {
    match kind {
        ScheduleKind::Helpdesk => 5,
        ScheduleKind::Lab => 6,
    }
}

fn canonical_hours(kind: ScheduleKind) -> Vec<u32> {
    match kind {
        ScheduleKind::Helpdesk => (HELPDESK_FIRST_HOUR..HELPDESK_LAST_HOUR).collect(),
        ScheduleKind::Lab => LAB_BLOCK_START_HOURS.to_vec(),
    }
}

fn slot_label(kind: ScheduleKind, hour: u32) -> String {
    format!("{}:00 - {}:00", hour, shift_end_hour(kind, hour))
}

/// Assembles the grid tree, caching the formatted result briefly.
pub struct ScheduleGridBuilder {
    schedule_repo: Arc<dyn ScheduleRepository>,
    staff_repo: Arc<dyn StaffRepository>,
    availability_repo: Arc<dyn AvailabilityRepository>,
    redis: Option<RedisPool>,
}

impl ScheduleGridBuilder {
    pub fn new(
        schedule_repo: Arc<dyn ScheduleRepository>,
        staff_repo: Arc<dyn StaffRepository>,
        availability_repo: Arc<dyn AvailabilityRepository>,
        redis: Option<RedisPool>,
    ) -> Self {
        Self {
            schedule_repo,
            staff_repo,
            availability_repo,
            redis,
        }
    }

    pub async fn current_grid(&self, kind: ScheduleKind) -> DomainResult<ScheduleGrid> {
        let cache_key = cache_keys::schedule_grid(kind_label(kind));
        if let Some(mut conn) = self.redis.clone() {
            if let Some(cached) = get_cached::<ScheduleGrid>(&mut conn, &cache_key).await {
                return Ok(cached);
            }
        }

        let grid = self.build(kind).await?;

        if let Some(mut conn) = self.redis.clone() {
            set_cached(&mut conn, &cache_key, &grid, cache_ttl::SCHEDULE_GRID).await;
        }

        Ok(grid)
    }

    async fn build(&self, kind: ScheduleKind) -> DomainResult<ScheduleGrid> {
        let schedule = self.schedule_repo.find_schedule(kind.primary_id()).await?;
        let schedule = match schedule {
            Some(schedule) => schedule,
            None => return Ok(empty_grid(kind)),
        };

        let shifts = self.schedule_repo.list_shifts(schedule.id).await?;
        let allocations = self
            .schedule_repo
            .list_allocations_for_schedule(schedule.id)
            .await?;

        let pool = self.active_pool(kind).await?;

        let mut usernames: HashSet<String> =
            allocations.iter().map(|a| a.username.clone()).collect();
        usernames.extend(pool.iter().cloned());
        let usernames: Vec<String> = usernames.into_iter().collect();
        let students: HashMap<String, Student> = self
            .staff_repo
            .find_students(&usernames)
            .await?
            .into_iter()
            .map(|student| (student.username.clone(), student))
            .collect();

        let mut windows: Vec<Availability> = Vec::new();
        for day in 0..operating_days(kind) as i32 {
            windows.extend(self.availability_repo.list_for_day(day).await?);
        }

        let mut assistants_by_shift: HashMap<i32, Vec<GridStaff>> = HashMap::new();
        for allocation in &allocations {
            let name = students
                .get(&allocation.username)
                .map(|student| student.display_name().to_string())
                .unwrap_or_else(|| allocation.username.clone());
            assistants_by_shift
                .entry(allocation.shift_id)
                .or_default()
                .push(GridStaff {
                    username: allocation.username.clone(),
                    name,
                });
        }

        let mut shifts_by_cell: HashMap<(i32, u32), &Shift> = HashMap::new();
        for shift in &shifts {
            let day = shift.weekday_index();
            if day >= operating_days(kind) as i32 {
                continue;
            }
            shifts_by_cell.insert((day, shift.start_hour()), shift);
        }

        let hours = canonical_hours(kind);
        let mut days = Vec::with_capacity(operating_days(kind));
        for day in 0..operating_days(kind) {
            let date = schedule.start_date + Duration::days(day as i64);
            let mut cells = Vec::with_capacity(hours.len());

            for &hour in &hours {
                let shift = shifts_by_cell.get(&(day as i32, hour));
                let available_staff =
                    available_for(&windows, &students, &pool, day as i32, hour);

                cells.push(match shift {
                    Some(shift) => GridShift {
                        shift_id: Some(shift.id),
                        time: shift.formatted_time(),
                        hour,
                        date: shift.date.format("%Y-%m-%d").to_string(),
                        assistants: assistants_by_shift
                            .get(&shift.id)
                            .cloned()
                            .unwrap_or_default(),
                        available_staff,
                    },
                    None => GridShift {
                        shift_id: None,
                        time: slot_label(kind, hour),
                        hour,
                        date: date.format("%Y-%m-%d").to_string(),
                        assistants: Vec::new(),
                        available_staff,
                    },
                });
            }

            days.push(GridDay {
                day: DAY_NAMES[day].to_string(),
                day_code: DAY_CODES[day].to_string(),
                date: date.format("%d %b").to_string(),
                shifts: cells,
            });
        }

        Ok(ScheduleGrid {
            schedule_id: Some(schedule.id),
            date_range: schedule.formatted_date_range(),
            is_published: schedule.is_published,
            kind,
            days,
        })
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
}

fn available_for(
    windows: &[Availability],
    students: &HashMap<String, Student>,
    pool: &HashSet<String>,
    day: i32,
    hour: u32,
) -> Vec<GridStaff> {
    let mut seen = HashSet::new();
    let mut staff: Vec<GridStaff> = windows
        .iter()
        .filter(|window| {
            window.day_of_week == day
                && window.covers_hour(hour)
                && pool.contains(&window.username)
                && seen.insert(window.username.clone())
        })
        .map(|window| GridStaff {
            username: window.username.clone(),
            name: students
                .get(&window.username)
                .map(|student| student.display_name().to_string())
                .unwrap_or_else(|| window.username.clone()),
        })
        .collect();
    staff.sort_by(|a, b| a.username.cmp(&b.username));
    staff
}

fn empty_grid(kind: ScheduleKind) -> ScheduleGrid {
    let hours = canonical_hours(kind);
    let days = (0..operating_days(kind))
        .map(|day| GridDay {
            day: DAY_NAMES[day].to_string(),
            day_code: DAY_CODES[day].to_string(),
            date: String::new(),
            shifts: hours
                .iter()
                .map(|&hour| GridShift {
                    shift_id: None,
                    time: slot_label(kind, hour),
                    hour,
                    date: String::new(),
                    assistants: Vec::new(),
                    available_staff: Vec::new(),
                })
                .collect(),
        })
        .collect();

    ScheduleGrid {
        schedule_id: None,
        date_range: "No schedule available".to_string(),
        is_published: false,
        kind,
        days,
    }
}

fn kind_label(kind: ScheduleKind) -> &'static str {
    match kind {
        ScheduleKind::Helpdesk => "helpdesk",
        ScheduleKind::Lab => "lab",
    }
}
