use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use shared::{DomainResult, ScheduleKind};

use crate::domain::entities::{Allocation, Schedule, Shift, ShiftCourseDemand};

/// A shift to be inserted by the generator, with its demand rows and the
/// staff the solver assigned to it.
#[derive(Debug, Clone)]
pub struct NewShift {
    pub date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub demands: Vec<NewCourseDemand>,
    pub assigned: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewCourseDemand {
    pub course_code: String,
    pub tutors_required: i32,
    pub weight: i32,
}

/// One grid cell of a bulk editor save: a concrete shift window plus the
/// usernames that should hold it afterwards.
#[derive(Debug, Clone)]
pub struct SavedSlot {
    pub date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub usernames: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleStats {
    pub total_shifts: i64,
    pub assigned_shifts: i64,
    pub total_assignments: i64,
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Find a schedule by id
    async fn find_schedule(&self, id: i32) -> DomainResult<Option<Schedule>>;

    /// Create the primary schedule of a kind, or move its window
    async fn upsert_primary_schedule(
        &self,
        kind: ScheduleKind,
        start_date: NaiveDate,
        end_date: NaiveDate,
        generated_at: NaiveDateTime,
    ) -> DomainResult<Schedule>;

    /// Atomically replace the shifts, demands and allocations of a schedule
    /// inside [start, end]. Returns (shifts created, assignments created).
    async fn replace_window(
        &self,
        schedule_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        shifts: Vec<NewShift>,
        created_at: NaiveDateTime,
    ) -> DomainResult<(u64, u64)>;

    /// Remove every shift and allocation of a schedule and reset its
    /// published flag. Returns (shifts removed, allocations removed).
    async fn clear_schedule(&self, schedule_id: i32) -> DomainResult<(u64, u64)>;

    /// Flip `is_published`; false when the schedule was already published
    async fn mark_published(&self, schedule_id: i32) -> DomainResult<bool>;

    /// Distinct staff allocated anywhere on a schedule
    async fn distinct_allocated_usernames(&self, schedule_id: i32) -> DomainResult<Vec<String>>;

    /// All shifts of a schedule
    async fn list_shifts(&self, schedule_id: i32) -> DomainResult<Vec<Shift>>;

    /// Find a shift by id
    async fn find_shift(&self, shift_id: i32) -> DomainResult<Option<Shift>>;

    /// Find a shift of a schedule by its exact start
    async fn find_shift_by_start(
        &self,
        schedule_id: i32,
        start_time: NaiveDateTime,
    ) -> DomainResult<Option<Shift>>;

    /// Demand rows of one shift
    #[allow(dead_code)]
    async fn list_demands_for_shift(&self, shift_id: i32) -> DomainResult<Vec<ShiftCourseDemand>>;

    /// Allocations of one shift
    async fn list_allocations_for_shift(&self, shift_id: i32) -> DomainResult<Vec<Allocation>>;

    /// All allocations of a schedule
    async fn list_allocations_for_schedule(&self, schedule_id: i32)
        -> DomainResult<Vec<Allocation>>;

    /// Find one allocation by (shift, staff)
    async fn find_allocation(
        &self,
        shift_id: i32,
        username: &str,
    ) -> DomainResult<Option<Allocation>>;

    /// Insert one allocation. The parent shift row is locked for the
    /// transaction; availability must cover the shift (precondition error)
    /// and the (shift, staff) pair must be new (conflict error).
    async fn insert_allocation(
        &self,
        shift_id: i32,
        username: &str,
        created_at: NaiveDateTime,
    ) -> DomainResult<Allocation>;

    /// Delete exactly one allocation; not-found error when absent
    async fn delete_allocation(&self, shift_id: i32, username: &str) -> DomainResult<()>;

    /// Bulk editor save: within one transaction, resolve or create the
    /// shift for every slot, drop existing allocations in [start, end],
    /// and insert the new ones. Slots referencing unknown staff or staff
    /// whose availability does not cover the shift fail the whole save.
    async fn save_grid(
        &self,
        schedule_id: i32,
        kind: ScheduleKind,
        start_date: NaiveDate,
        end_date: NaiveDate,
        slots: Vec<SavedSlot>,
        created_at: NaiveDateTime,
    ) -> DomainResult<()>;

    /// Whether the staff member already holds an allocation on the
    /// schedule at (weekday, hour). Information only.
    async fn has_allocation_at(
        &self,
        schedule_id: i32,
        username: &str,
        day_of_week: i32,
        hour: u32,
    ) -> DomainResult<bool>;

    /// Upcoming shifts a staff member is allocated to, date-ordered
    async fn shifts_for_staff_between(
        &self,
        username: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DomainResult<Vec<Shift>>;

    /// Coverage summary of a schedule
    async fn summary_stats(&self, schedule_id: i32) -> DomainResult<ScheduleStats>;
}
