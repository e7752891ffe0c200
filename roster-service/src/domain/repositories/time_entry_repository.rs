use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::DomainResult;

use crate::domain::entities::{Shift, TimeEntry};

#[async_trait]
pub trait TimeEntryRepository: Send + Sync {
    /// The staff member's active entry, if any
    async fn find_active(&self, username: &str) -> DomainResult<Option<TimeEntry>>;

    /// Open a new active entry. The staff member's entries are locked for
    /// the transaction; a second active entry is a conflict error.
    async fn insert_active(
        &self,
        username: &str,
        shift_id: Option<i32>,
        clock_in: NaiveDateTime,
    ) -> DomainResult<TimeEntry>;

    /// Complete the staff member's active entry at `clock_out`, crediting
    /// the worked hours to the assistant's ledger in the same transaction.
    /// Not-found error when no active entry exists.
    async fn complete_active(
        &self,
        username: &str,
        clock_out: NaiveDateTime,
    ) -> DomainResult<TimeEntry>;

    /// Complete one entry by id if it is still active; used by the
    /// auto-completion sweep. Returns None when the entry was already
    /// completed by a concurrent caller.
    async fn complete_if_active(
        &self,
        entry_id: i32,
        clock_out: NaiveDateTime,
    ) -> DomainResult<Option<TimeEntry>>;

    /// Record an absence for (staff, shift) with clock_in = shift start.
    /// Conflict error when any entry already exists for the pair.
    async fn insert_absent(
        &self,
        username: &str,
        shift_id: i32,
        clock_in: NaiveDateTime,
    ) -> DomainResult<TimeEntry>;

    /// Every active entry, paired with its shift when it has one
    async fn list_active_with_shifts(&self) -> DomainResult<Vec<(TimeEntry, Option<Shift>)>>;

    /// Active entries of one staff member, paired with their shifts
    async fn list_active_with_shifts_for_staff(
        &self,
        username: &str,
    ) -> DomainResult<Vec<(TimeEntry, Option<Shift>)>>;

    /// All entries of a staff member
    async fn list_for_staff(&self, username: &str) -> DomainResult<Vec<TimeEntry>>;

    /// Most recent entries of a staff member with their shifts, newest first
    async fn list_recent_with_shifts(
        &self,
        username: &str,
        limit: i64,
    ) -> DomainResult<Vec<(TimeEntry, Option<Shift>)>>;

    /// Entry for (staff, shift), any status
    async fn find_for_shift(
        &self,
        username: &str,
        shift_id: i32,
    ) -> DomainResult<Option<TimeEntry>>;
}
