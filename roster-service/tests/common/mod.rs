//! In-memory repository implementations and seed helpers shared by the
//! integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, RwLock};

use roster_service::domain::entities::{
    Allocation, Availability, Course, CourseCapability, HelpDeskAssistant, LabAssistant,
    Notification, Request, Schedule, Shift, ShiftCourseDemand, Student, User,
};
use roster_service::domain::repositories::{
    AvailabilityRepository, CourseRepository, NewRequest, NotificationRepository,
    RequestRepository, SavedSlot, ScheduleRepository, ScheduleStats, StaffRepository,
    TimeEntryRepository,
};
use roster_service::domain::repositories::NewShift;
use shared::{
    DomainError, DomainResult, NotificationKind, RequestStatus, ScheduleKind, TimeEntryStatus,
    UserKind,
};

use roster_service::domain::entities::TimeEntry;

/// One shared backing store; each mock repository holds an Arc to it so
/// cross-entity guards (availability coverage, duplicate allocations)
/// behave like the real database.
#[derive(Default)]
pub struct InMemoryStore {
    pub users: RwLock<HashMap<String, User>>,
    pub students: RwLock<HashMap<String, Student>>,
    pub helpdesk_assistants: RwLock<HashMap<String, HelpDeskAssistant>>,
    pub lab_assistants: RwLock<HashMap<String, LabAssistant>>,
    pub capabilities: RwLock<Vec<CourseCapability>>,
    pub courses: RwLock<Vec<Course>>,
    pub availabilities: RwLock<Vec<Availability>>,
    pub schedules: RwLock<HashMap<i32, Schedule>>,
    pub shifts: RwLock<Vec<Shift>>,
    pub demands: RwLock<Vec<ShiftCourseDemand>>,
    pub allocations: RwLock<Vec<Allocation>>,
    pub time_entries: RwLock<Vec<TimeEntry>>,
    pub requests: RwLock<Vec<Request>>,
    pub notifications: RwLock<Vec<Notification>>,
    next_id: AtomicI32,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicI32::new(1),
            ..Default::default()
        })
    }

    pub fn next_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn availability_covers(&self, username: &str, shift: &Shift) -> bool {
        let day = shift.date.weekday().num_days_from_monday() as i32;
        self.availabilities
            .read()
            .unwrap()
            .iter()
            .any(|window| {
                window.username == username
                    && window.day_of_week == day
                    && window.start_time <= shift.start_time.time()
                    && shift.end_time.time() <= window.end_time
            })
    }

    // ---- seed helpers -------------------------------------------------

    pub fn seed_admin(&self, username: &str) {
        self.users.write().unwrap().insert(
            username.to_string(),
            User {
                username: username.to_string(),
                password_hash: "hash".to_string(),
                kind: UserKind::Admin,
            },
        );
    }

    pub fn seed_assistant(&self, username: &str, name: &str, hours_minimum: i32) {
        self.users.write().unwrap().insert(
            username.to_string(),
            User {
                username: username.to_string(),
                password_hash: "hash".to_string(),
                kind: UserKind::Student,
            },
        );
        self.students.write().unwrap().insert(
            username.to_string(),
            Student {
                username: username.to_string(),
                name: Some(name.to_string()),
                degree: shared::Degree::BSc,
                profile: None,
            },
        );
        self.helpdesk_assistants.write().unwrap().insert(
            username.to_string(),
            HelpDeskAssistant {
                username: username.to_string(),
                rate: 20.0,
                active: true,
                hours_worked: 0.0,
                hours_minimum,
            },
        );
    }

    pub fn seed_lab_assistant(&self, username: &str, name: &str, experience: bool) {
        self.users.write().unwrap().insert(
            username.to_string(),
            User {
                username: username.to_string(),
                password_hash: "hash".to_string(),
                kind: UserKind::Student,
            },
        );
        self.students.write().unwrap().insert(
            username.to_string(),
            Student {
                username: username.to_string(),
                name: Some(name.to_string()),
                degree: shared::Degree::BSc,
                profile: None,
            },
        );
        self.lab_assistants.write().unwrap().insert(
            username.to_string(),
            LabAssistant {
                username: username.to_string(),
                active: true,
                experience,
            },
        );
    }

    pub fn seed_course(&self, code: &str, name: &str) {
        self.courses.write().unwrap().push(Course {
            code: code.to_string(),
            name: name.to_string(),
        });
    }

    pub fn seed_capability(&self, username: &str, course_code: &str) {
        let id = self.next_id();
        self.capabilities.write().unwrap().push(CourseCapability {
            id,
            assistant_username: username.to_string(),
            course_code: course_code.to_string(),
        });
    }

    pub fn seed_availability(&self, username: &str, day: i32, start_hour: u32, end_hour: u32) {
        let id = self.next_id();
        self.availabilities.write().unwrap().push(Availability {
            id,
            username: username.to_string(),
            day_of_week: day,
            start_time: NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end_hour, 0, 0).unwrap(),
        });
    }

    /// Availability on every helpdesk weekday, 09:00-17:00.
    pub fn seed_weekday_availability(&self, username: &str) {
        for day in 0..5 {
            self.seed_availability(username, day, 9, 17);
        }
    }

    pub fn seed_shift(
        &self,
        schedule_id: i32,
        date: NaiveDate,
        start_hour: u32,
        end_hour: u32,
    ) -> i32 {
        let id = self.next_id();
        self.shifts.write().unwrap().push(Shift {
            id,
            date,
            start_time: date.and_hms_opt(start_hour, 0, 0).unwrap(),
            end_time: date.and_hms_opt(end_hour, 0, 0).unwrap(),
            schedule_id,
        });
        id
    }

    pub fn seed_schedule(&self, kind: ScheduleKind, start: NaiveDate, end: NaiveDate) -> i32 {
        let id = kind.primary_id();
        self.schedules.write().unwrap().insert(
            id,
            Schedule {
                id,
                start_date: start,
                end_date: end,
                kind,
                generated_at: start.and_hms_opt(0, 0, 0).unwrap(),
                is_published: false,
            },
        );
        id
    }

    pub fn seed_allocation(&self, username: &str, shift_id: i32, schedule_id: i32) {
        let id = self.next_id();
        self.allocations.write().unwrap().push(Allocation {
            id,
            username: username.to_string(),
            shift_id,
            schedule_id,
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        });
    }

    pub fn allocation_count(&self, shift_id: i32) -> usize {
        self.allocations
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.shift_id == shift_id)
            .count()
    }

    pub fn notifications_for(&self, username: &str) -> Vec<Notification> {
        self.notifications
            .read()
            .unwrap()
            .iter()
            .filter(|n| n.username == username)
            .cloned()
            .collect()
    }
}

// ---- StaffRepository ---------------------------------------------------

pub struct MockStaffRepository(pub Arc<InMemoryStore>);

#[async_trait]
impl StaffRepository for MockStaffRepository {
    async fn find_user(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self.0.users.read().unwrap().get(username).cloned())
    }

    async fn find_student(&self, username: &str) -> DomainResult<Option<Student>> {
        Ok(self.0.students.read().unwrap().get(username).cloned())
    }

    async fn find_students(&self, usernames: &[String]) -> DomainResult<Vec<Student>> {
        let students = self.0.students.read().unwrap();
        let mut found: Vec<Student> = usernames
            .iter()
            .filter_map(|username| students.get(username).cloned())
            .collect();
        found.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(found)
    }

    async fn find_help_desk_assistant(
        &self,
        username: &str,
    ) -> DomainResult<Option<HelpDeskAssistant>> {
        Ok(self
            .0
            .helpdesk_assistants
            .read()
            .unwrap()
            .get(username)
            .cloned())
    }

    async fn find_lab_assistant(&self, username: &str) -> DomainResult<Option<LabAssistant>> {
        Ok(self.0.lab_assistants.read().unwrap().get(username).cloned())
    }

    async fn list_active_help_desk_assistants(&self) -> DomainResult<Vec<HelpDeskAssistant>> {
        let mut assistants: Vec<HelpDeskAssistant> = self
            .0
            .helpdesk_assistants
            .read()
            .unwrap()
            .values()
            .filter(|a| a.active)
            .cloned()
            .collect();
        assistants.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(assistants)
    }

    async fn list_active_lab_assistants(&self) -> DomainResult<Vec<LabAssistant>> {
        let mut assistants: Vec<LabAssistant> = self
            .0
            .lab_assistants
            .read()
            .unwrap()
            .values()
            .filter(|a| a.active)
            .cloned()
            .collect();
        assistants.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(assistants)
    }

    async fn list_capabilities(&self, username: &str) -> DomainResult<Vec<CourseCapability>> {
        Ok(self
            .0
            .capabilities
            .read()
            .unwrap()
            .iter()
            .filter(|c| c.assistant_username == username)
            .cloned()
            .collect())
    }

    async fn list_all_capabilities(&self) -> DomainResult<Vec<CourseCapability>> {
        Ok(self.0.capabilities.read().unwrap().clone())
    }

    async fn list_admin_usernames(&self) -> DomainResult<Vec<String>> {
        let mut admins: Vec<String> = self
            .0
            .users
            .read()
            .unwrap()
            .values()
            .filter(|u| u.kind == UserKind::Admin)
            .map(|u| u.username.clone())
            .collect();
        admins.sort();
        Ok(admins)
    }
}

// ---- CourseRepository --------------------------------------------------

pub struct MockCourseRepository(pub Arc<InMemoryStore>);

#[async_trait]
impl CourseRepository for MockCourseRepository {
    async fn list_courses(&self) -> DomainResult<Vec<Course>> {
        Ok(self.0.courses.read().unwrap().clone())
    }

    async fn find_course(&self, code: &str) -> DomainResult<Option<Course>> {
        Ok(self
            .0
            .courses
            .read()
            .unwrap()
            .iter()
            .find(|c| c.code == code)
            .cloned())
    }
}

// ---- AvailabilityRepository --------------------------------------------

pub struct MockAvailabilityRepository(pub Arc<InMemoryStore>);

#[async_trait]
impl AvailabilityRepository for MockAvailabilityRepository {
    async fn list_for_staff_on_day(
        &self,
        username: &str,
        day_of_week: i32,
    ) -> DomainResult<Vec<Availability>> {
        Ok(self
            .0
            .availabilities
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.username == username && a.day_of_week == day_of_week)
            .cloned()
            .collect())
    }

    async fn list_for_day(&self, day_of_week: i32) -> DomainResult<Vec<Availability>> {
        Ok(self
            .0
            .availabilities
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.day_of_week == day_of_week)
            .cloned()
            .collect())
    }

    async fn list_for_staff(&self, usernames: &[String]) -> DomainResult<Vec<Availability>> {
        Ok(self
            .0
            .availabilities
            .read()
            .unwrap()
            .iter()
            .filter(|a| usernames.contains(&a.username))
            .cloned()
            .collect())
    }
}

// ---- ScheduleRepository ------------------------------------------------

pub struct MockScheduleRepository(pub Arc<InMemoryStore>);

#[async_trait]
impl ScheduleRepository for MockScheduleRepository {
    async fn find_schedule(&self, id: i32) -> DomainResult<Option<Schedule>> {
        Ok(self.0.schedules.read().unwrap().get(&id).cloned())
    }

    async fn upsert_primary_schedule(
        &self,
        kind: ScheduleKind,
        start_date: NaiveDate,
        end_date: NaiveDate,
        generated_at: NaiveDateTime,
    ) -> DomainResult<Schedule> {
        let id = kind.primary_id();
        let mut schedules = self.0.schedules.write().unwrap();
        let schedule = schedules
            .entry(id)
            .and_modify(|existing| {
                existing.start_date = start_date;
                existing.end_date = end_date;
                existing.generated_at = generated_at;
            })
            .or_insert(Schedule {
                id,
                start_date,
                end_date,
                kind,
                generated_at,
                is_published: false,
            });
        Ok(schedule.clone())
    }

    async fn replace_window(
        &self,
        schedule_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        shifts: Vec<NewShift>,
        created_at: NaiveDateTime,
    ) -> DomainResult<(u64, u64)> {
        let removed_ids: Vec<i32> = {
            let mut stored = self.0.shifts.write().unwrap();
            let removed: Vec<i32> = stored
                .iter()
                .filter(|s| {
                    s.schedule_id == schedule_id && s.date >= start_date && s.date <= end_date
                })
                .map(|s| s.id)
                .collect();
            stored.retain(|s| !removed.contains(&s.id));
            removed
        };
        self.0
            .allocations
            .write()
            .unwrap()
            .retain(|a| !removed_ids.contains(&a.shift_id));
        self.0
            .demands
            .write()
            .unwrap()
            .retain(|d| !removed_ids.contains(&d.shift_id));

        let mut shifts_created = 0u64;
        let mut assignments_created = 0u64;

        for new_shift in shifts {
            let shift_id = self.0.next_id();
            self.0.shifts.write().unwrap().push(Shift {
                id: shift_id,
                date: new_shift.date,
                start_time: new_shift.start_time,
                end_time: new_shift.end_time,
                schedule_id,
            });
            shifts_created += 1;

            for demand in &new_shift.demands {
                let id = self.0.next_id();
                self.0.demands.write().unwrap().push(ShiftCourseDemand {
                    id,
                    shift_id,
                    course_code: demand.course_code.clone(),
                    tutors_required: demand.tutors_required,
                    weight: demand.weight,
                });
            }

            for username in &new_shift.assigned {
                let id = self.0.next_id();
                self.0.allocations.write().unwrap().push(Allocation {
                    id,
                    username: username.clone(),
                    shift_id,
                    schedule_id,
                    created_at,
                });
                assignments_created += 1;
            }
        }

        Ok((shifts_created, assignments_created))
    }

    async fn clear_schedule(&self, schedule_id: i32) -> DomainResult<(u64, u64)> {
        let allocations = {
            let mut stored = self.0.allocations.write().unwrap();
            let before = stored.len();
            stored.retain(|a| a.schedule_id != schedule_id);
            (before - stored.len()) as u64
        };
        let shifts = {
            let mut stored = self.0.shifts.write().unwrap();
            let removed: Vec<i32> = stored
                .iter()
                .filter(|s| s.schedule_id == schedule_id)
                .map(|s| s.id)
                .collect();
            stored.retain(|s| s.schedule_id != schedule_id);
            self.0
                .demands
                .write()
                .unwrap()
                .retain(|d| !removed.contains(&d.shift_id));
            removed.len() as u64
        };
        if let Some(schedule) = self.0.schedules.write().unwrap().get_mut(&schedule_id) {
            schedule.is_published = false;
        }
        Ok((shifts, allocations))
    }

    async fn mark_published(&self, schedule_id: i32) -> DomainResult<bool> {
        let mut schedules = self.0.schedules.write().unwrap();
        match schedules.get_mut(&schedule_id) {
            Some(schedule) if !schedule.is_published => {
                schedule.is_published = true;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(DomainError::NotFound("Schedule not found.".to_string())),
        }
    }

    async fn distinct_allocated_usernames(&self, schedule_id: i32) -> DomainResult<Vec<String>> {
        let mut usernames: Vec<String> = self
            .0
            .allocations
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.schedule_id == schedule_id)
            .map(|a| a.username.clone())
            .collect();
        usernames.sort();
        usernames.dedup();
        Ok(usernames)
    }

    async fn list_shifts(&self, schedule_id: i32) -> DomainResult<Vec<Shift>> {
        let mut shifts: Vec<Shift> = self
            .0
            .shifts
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.schedule_id == schedule_id)
            .cloned()
            .collect();
        shifts.sort_by_key(|s| s.start_time);
        Ok(shifts)
    }

    async fn find_shift(&self, shift_id: i32) -> DomainResult<Option<Shift>> {
        Ok(self
            .0
            .shifts
            .read()
            .unwrap()
            .iter()
            .find(|s| s.id == shift_id)
            .cloned())
    }

    async fn find_shift_by_start(
        &self,
        schedule_id: i32,
        start_time: NaiveDateTime,
    ) -> DomainResult<Option<Shift>> {
        Ok(self
            .0
            .shifts
            .read()
            .unwrap()
            .iter()
            .find(|s| s.schedule_id == schedule_id && s.start_time == start_time)
            .cloned())
    }

    async fn list_demands_for_shift(&self, shift_id: i32) -> DomainResult<Vec<ShiftCourseDemand>> {
        Ok(self
            .0
            .demands
            .read()
            .unwrap()
            .iter()
            .filter(|d| d.shift_id == shift_id)
            .cloned()
            .collect())
    }

    async fn list_allocations_for_shift(&self, shift_id: i32) -> DomainResult<Vec<Allocation>> {
        Ok(self
            .0
            .allocations
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.shift_id == shift_id)
            .cloned()
            .collect())
    }

    async fn list_allocations_for_schedule(
        &self,
        schedule_id: i32,
    ) -> DomainResult<Vec<Allocation>> {
        Ok(self
            .0
            .allocations
            .read()
            .unwrap()
            .iter()
            .filter(|a| a.schedule_id == schedule_id)
            .cloned()
            .collect())
    }

    async fn find_allocation(
        &self,
        shift_id: i32,
        username: &str,
    ) -> DomainResult<Option<Allocation>> {
        Ok(self
            .0
            .allocations
            .read()
            .unwrap()
            .iter()
            .find(|a| a.shift_id == shift_id && a.username == username)
            .cloned())
    }

    async fn insert_allocation(
        &self,
        shift_id: i32,
        username: &str,
        created_at: NaiveDateTime,
    ) -> DomainResult<Allocation> {
        let shift = self
            .find_shift(shift_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Shift not found.".to_string()))?;

        if !self.0.students.read().unwrap().contains_key(username) {
            return Err(DomainError::NotFound("Staff member not found.".to_string()));
        }
        if self.find_allocation(shift_id, username).await?.is_some() {
            return Err(DomainError::Conflict(
                "Staff member is already allocated to this shift".to_string(),
            ));
        }
        if !self.0.availability_covers(username, &shift) {
            return Err(DomainError::FailedPrecondition(
                "Availability does not cover this shift".to_string(),
            ));
        }

        let id = self.0.next_id();
        let allocation = Allocation {
            id,
            username: username.to_string(),
            shift_id,
            schedule_id: shift.schedule_id,
            created_at,
        };
        self.0.allocations.write().unwrap().push(allocation.clone());
        Ok(allocation)
    }

    async fn delete_allocation(&self, shift_id: i32, username: &str) -> DomainResult<()> {
        let mut allocations = self.0.allocations.write().unwrap();
        let before = allocations.len();
        allocations.retain(|a| !(a.shift_id == shift_id && a.username == username));
        if allocations.len() == before {
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
        let window_ids: Vec<i32> = self
            .0
            .shifts
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.schedule_id == schedule_id && s.date >= start_date && s.date <= end_date)
            .map(|s| s.id)
            .collect();
        self.0
            .allocations
            .write()
            .unwrap()
            .retain(|a| !window_ids.contains(&a.shift_id));

        for slot in slots {
            let existing = self
                .find_shift_by_start(schedule_id, slot.start_time)
                .await?;
            let shift = match existing {
                Some(shift) => {
                    let mut stored = self.0.shifts.write().unwrap();
                    let stored_shift = stored
                        .iter_mut()
                        .find(|s| s.id == shift.id)
                        .expect("shift exists");
                    stored_shift.end_time = slot.end_time;
                    stored_shift.clone()
                }
                None => {
                    let id = self.0.next_id();
                    let shift = Shift {
                        id,
                        date: slot.date,
                        start_time: slot.start_time,
                        end_time: slot.end_time,
                        schedule_id,
                    };
                    self.0.shifts.write().unwrap().push(shift.clone());
                    shift
                }
            };

            for username in &slot.usernames {
                if !self.0.students.read().unwrap().contains_key(username) {
                    return Err(DomainError::NotFound(format!(
                        "Staff member {} not found",
                        username
                    )));
                }
                if !self.0.availability_covers(username, &shift) {
                    return Err(DomainError::FailedPrecondition(format!(
                        "Availability of {} does not cover the {} shift",
                        username,
                        shift.formatted_time()
                    )));
                }
                if self.find_allocation(shift.id, username).await?.is_none() {
                    let id = self.0.next_id();
                    self.0.allocations.write().unwrap().push(Allocation {
                        id,
                        username: username.clone(),
                        shift_id: shift.id,
                        schedule_id,
                        created_at,
                    });
                }
            }
        }

        Ok(())
    }

    async fn has_allocation_at(
        &self,
        schedule_id: i32,
        username: &str,
        day_of_week: i32,
        hour: u32,
    ) -> DomainResult<bool> {
        let shifts = self.0.shifts.read().unwrap();
        Ok(self.0.allocations.read().unwrap().iter().any(|a| {
            a.username == username
                && a.schedule_id == schedule_id
                && shifts.iter().any(|s| {
                    s.id == a.shift_id
                        && s.weekday_index() == day_of_week
                        && s.start_hour() == hour
                })
        }))
    }

    async fn shifts_for_staff_between(
        &self,
        username: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DomainResult<Vec<Shift>> {
        let allocations = self.0.allocations.read().unwrap();
        let shift_ids: Vec<i32> = allocations
            .iter()
            .filter(|a| a.username == username)
            .map(|a| a.shift_id)
            .collect();

        let mut shifts: Vec<Shift> = self
            .0
            .shifts
            .read()
            .unwrap()
            .iter()
            .filter(|s| shift_ids.contains(&s.id) && s.date >= from && s.date <= to)
            .cloned()
            .collect();
        shifts.sort_by_key(|s| s.start_time);
        Ok(shifts)
    }

    async fn summary_stats(&self, schedule_id: i32) -> DomainResult<ScheduleStats> {
        let total_shifts = self
            .0
            .shifts
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.schedule_id == schedule_id)
            .count() as i64;
        let allocations = self.0.allocations.read().unwrap();
        let mut assigned: Vec<i32> = allocations
            .iter()
            .filter(|a| a.schedule_id == schedule_id)
            .map(|a| a.shift_id)
            .collect();
        let total_assignments = assigned.len() as i64;
        assigned.sort();
        assigned.dedup();

        Ok(ScheduleStats {
            total_shifts,
            assigned_shifts: assigned.len() as i64,
            total_assignments,
        })
    }
}

// ---- TimeEntryRepository -----------------------------------------------

pub struct MockTimeEntryRepository(pub Arc<InMemoryStore>);

impl MockTimeEntryRepository {
    fn credit_hours(&self, username: &str, hours: f64) {
        if let Some(assistant) = self
            .0
            .helpdesk_assistants
            .write()
            .unwrap()
            .get_mut(username)
        {
            assistant.hours_worked += hours;
        }
    }

    fn shift_for(&self, entry: &TimeEntry) -> Option<Shift> {
        entry.shift_id.and_then(|id| {
            self.0
                .shifts
                .read()
                .unwrap()
                .iter()
                .find(|s| s.id == id)
                .cloned()
        })
    }
}

#[async_trait]
impl TimeEntryRepository for MockTimeEntryRepository {
    async fn find_active(&self, username: &str) -> DomainResult<Option<TimeEntry>> {
        Ok(self
            .0
            .time_entries
            .read()
            .unwrap()
            .iter()
            .find(|e| e.username == username && e.status == TimeEntryStatus::Active)
            .cloned())
    }

    async fn insert_active(
        &self,
        username: &str,
        shift_id: Option<i32>,
        clock_in: NaiveDateTime,
    ) -> DomainResult<TimeEntry> {
        if self.find_active(username).await?.is_some() {
            return Err(DomainError::Conflict(
                "You already have an active clock-in record".to_string(),
            ));
        }
        let id = self.0.next_id();
        let entry = TimeEntry {
            id,
            username: username.to_string(),
            shift_id,
            clock_in,
            clock_out: None,
            status: TimeEntryStatus::Active,
        };
        self.0.time_entries.write().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn complete_active(
        &self,
        username: &str,
        clock_out: NaiveDateTime,
    ) -> DomainResult<TimeEntry> {
        let completed = {
            let mut entries = self.0.time_entries.write().unwrap();
            let entry = entries
                .iter_mut()
                .find(|e| e.username == username && e.status == TimeEntryStatus::Active)
                .ok_or_else(|| {
                    DomainError::NotFound("No active clock-in record found".to_string())
                })?;
            entry.clock_out = Some(clock_out);
            entry.status = TimeEntryStatus::Completed;
            entry.clone()
        };
        self.credit_hours(username, completed.hours_worked());
        Ok(completed)
    }

    async fn complete_if_active(
        &self,
        entry_id: i32,
        clock_out: NaiveDateTime,
    ) -> DomainResult<Option<TimeEntry>> {
        let completed = {
            let mut entries = self.0.time_entries.write().unwrap();
            match entries
                .iter_mut()
                .find(|e| e.id == entry_id && e.status == TimeEntryStatus::Active)
            {
                Some(entry) => {
                    entry.clock_out = Some(clock_out);
                    entry.status = TimeEntryStatus::Completed;
                    Some(entry.clone())
                }
                None => None,
            }
        };
        if let Some(entry) = &completed {
            self.credit_hours(&entry.username, entry.hours_worked());
        }
        Ok(completed)
    }

    async fn insert_absent(
        &self,
        username: &str,
        shift_id: i32,
        clock_in: NaiveDateTime,
    ) -> DomainResult<TimeEntry> {
        let exists = self
            .0
            .time_entries
            .read()
            .unwrap()
            .iter()
            .any(|e| e.username == username && e.shift_id == Some(shift_id));
        if exists {
            return Err(DomainError::Conflict(
                "A time entry already exists for this shift".to_string(),
            ));
        }
        let id = self.0.next_id();
        let entry = TimeEntry {
            id,
            username: username.to_string(),
            shift_id: Some(shift_id),
            clock_in,
            clock_out: None,
            status: TimeEntryStatus::Absent,
        };
        self.0.time_entries.write().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn list_active_with_shifts(&self) -> DomainResult<Vec<(TimeEntry, Option<Shift>)>> {
        let entries: Vec<TimeEntry> = self
            .0
            .time_entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.status == TimeEntryStatus::Active)
            .cloned()
            .collect();
        Ok(entries
            .into_iter()
            .map(|entry| {
                let shift = self.shift_for(&entry);
                (entry, shift)
            })
            .collect())
    }

    async fn list_active_with_shifts_for_staff(
        &self,
        username: &str,
    ) -> DomainResult<Vec<(TimeEntry, Option<Shift>)>> {
        let entries: Vec<TimeEntry> = self
            .0
            .time_entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.username == username && e.status == TimeEntryStatus::Active)
            .cloned()
            .collect();
        Ok(entries
            .into_iter()
            .map(|entry| {
                let shift = self.shift_for(&entry);
                (entry, shift)
            })
            .collect())
    }

    async fn list_for_staff(&self, username: &str) -> DomainResult<Vec<TimeEntry>> {
        Ok(self
            .0
            .time_entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.username == username)
            .cloned()
            .collect())
    }

    async fn list_recent_with_shifts(
        &self,
        username: &str,
        limit: i64,
    ) -> DomainResult<Vec<(TimeEntry, Option<Shift>)>> {
        let mut entries: Vec<TimeEntry> = self
            .0
            .time_entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.username == username)
            .cloned()
            .collect();
        entries.sort_by_key(|e| std::cmp::Reverse(e.clock_in));
        entries.truncate(limit as usize);
        Ok(entries
            .into_iter()
            .map(|entry| {
                let shift = self.shift_for(&entry);
                (entry, shift)
            })
            .collect())
    }

    async fn find_for_shift(
        &self,
        username: &str,
        shift_id: i32,
    ) -> DomainResult<Option<TimeEntry>> {
        Ok(self
            .0
            .time_entries
            .read()
            .unwrap()
            .iter()
            .find(|e| e.username == username && e.shift_id == Some(shift_id))
            .cloned())
    }
}

// ---- RequestRepository -------------------------------------------------

pub struct MockRequestRepository(pub Arc<InMemoryStore>);

#[async_trait]
impl RequestRepository for MockRequestRepository {
    async fn create(
        &self,
        request: NewRequest,
        created_at: NaiveDateTime,
    ) -> DomainResult<Request> {
        let id = self.0.next_id();
        let stored = Request {
            id,
            username: request.username,
            shift_id: request.shift_id,
            date: request.date,
            time_slot: request.time_slot,
            reason: request.reason,
            replacement: request.replacement,
            status: RequestStatus::Pending,
            created_at,
            approved_at: None,
            rejected_at: None,
        };
        self.0.requests.write().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Request>> {
        Ok(self
            .0
            .requests
            .read()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn set_status(
        &self,
        id: i32,
        status: RequestStatus,
        at: NaiveDateTime,
    ) -> DomainResult<Request> {
        let mut requests = self.0.requests.write().unwrap();
        let request = requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Request {} not found", id)))?;
        request.status = status;
        match status {
            RequestStatus::Approved => request.approved_at = Some(at),
            RequestStatus::Rejected => request.rejected_at = Some(at),
            _ => {}
        }
        Ok(request.clone())
    }

    async fn list_for_staff(&self, username: &str) -> DomainResult<Vec<Request>> {
        let mut requests: Vec<Request> = self
            .0
            .requests
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.username == username)
            .cloned()
            .collect();
        requests.sort_by_key(|r| std::cmp::Reverse(r.created_at));
        Ok(requests)
    }

    async fn list_all(&self) -> DomainResult<Vec<Request>> {
        let mut requests = self.0.requests.read().unwrap().clone();
        requests.sort_by_key(|r| std::cmp::Reverse(r.created_at));
        Ok(requests)
    }

    async fn pending_exists_for_shift(
        &self,
        username: &str,
        shift_id: i32,
    ) -> DomainResult<bool> {
        Ok(self.0.requests.read().unwrap().iter().any(|r| {
            r.username == username
                && r.shift_id == Some(shift_id)
                && r.status == RequestStatus::Pending
        }))
    }

    async fn count_pending(&self) -> DomainResult<i64> {
        Ok(self
            .0
            .requests
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .count() as i64)
    }
}

// ---- NotificationRepository --------------------------------------------

pub struct MockNotificationRepository(pub Arc<InMemoryStore>);

#[async_trait]
impl NotificationRepository for MockNotificationRepository {
    async fn create(
        &self,
        username: &str,
        message: &str,
        kind: NotificationKind,
        created_at: NaiveDateTime,
    ) -> DomainResult<Notification> {
        let id = self.0.next_id();
        let notification = Notification {
            id,
            username: username.to_string(),
            message: message.to_string(),
            kind,
            is_read: false,
            created_at,
        };
        self.0
            .notifications
            .write()
            .unwrap()
            .push(notification.clone());
        Ok(notification)
    }

    async fn list_for_user(
        &self,
        username: &str,
        limit: i64,
        include_read: bool,
    ) -> DomainResult<Vec<Notification>> {
        let mut notifications: Vec<Notification> = self
            .0
            .notifications
            .read()
            .unwrap()
            .iter()
            .filter(|n| n.username == username && (include_read || !n.is_read))
            .cloned()
            .collect();
        notifications.sort_by_key(|n| std::cmp::Reverse(n.created_at));
        notifications.truncate(limit as usize);
        Ok(notifications)
    }

    async fn mark_read(&self, id: i32) -> DomainResult<bool> {
        let mut notifications = self.0.notifications.write().unwrap();
        match notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, username: &str) -> DomainResult<u64> {
        let mut notifications = self.0.notifications.write().unwrap();
        let mut updated = 0u64;
        for notification in notifications
            .iter_mut()
            .filter(|n| n.username == username && !n.is_read)
        {
            notification.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn count_unread(&self, username: &str) -> DomainResult<i64> {
        Ok(self
            .0
            .notifications
            .read()
            .unwrap()
            .iter()
            .filter(|n| n.username == username && !n.is_read)
            .count() as i64)
    }
}

// ---- fixtures ----------------------------------------------------------

/// A Monday, so grids line up with day indices.
pub fn test_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}
