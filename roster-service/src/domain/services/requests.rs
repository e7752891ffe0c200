//! Shift-change request workflow.
//!
//! A request references one of the staff member's own allocations. Approval
//! and rejection are terminal and admin-only; cancellation is owner-only
//! and valid while pending. Approval does not reallocate the replacement.

use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use shared::{Clock, DomainError, DomainResult, RequestStatus};
use utoipa::ToSchema;

use crate::domain::entities::Request;
use crate::domain::repositories::{
    NewRequest, RequestRepository, ScheduleRepository, StaffRepository,
};
use crate::domain::services::Notifier;

pub const ERROR_REQUEST_NOT_FOUND: &str = "Request not found.";

/// How far ahead a volunteer can pick shifts to file requests against.
const REQUEST_HORIZON_DAYS: i64 = 14;

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestableShift {
    pub id: i32,
    pub day: String,
    pub date: String,
    pub time: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReplacementCandidate {
    pub id: String,
    pub name: String,
}

pub struct RequestService {
    request_repo: Arc<dyn RequestRepository>,
    schedule_repo: Arc<dyn ScheduleRepository>,
    staff_repo: Arc<dyn StaffRepository>,
    notifier: Arc<Notifier>,
    clock: Arc<dyn Clock>,
}

impl RequestService {
    pub fn new(
        request_repo: Arc<dyn RequestRepository>,
        schedule_repo: Arc<dyn ScheduleRepository>,
        staff_repo: Arc<dyn StaffRepository>,
        notifier: Arc<Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            request_repo,
            schedule_repo,
            staff_repo,
            notifier,
            clock,
        }
    }

    /// File a new request against one of the caller's allocations.
    pub async fn submit(
        &self,
        username: &str,
        shift_id: i32,
        reason: &str,
        replacement: Option<String>,
    ) -> DomainResult<Request> {
        let shift = self
            .schedule_repo
            .find_shift(shift_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Shift not found.".to_string()))?;

        self.schedule_repo
            .find_allocation(shift_id, username)
            .await?
            .ok_or_else(|| {
                DomainError::FailedPrecondition(
                    "You are not allocated to this shift".to_string(),
                )
            })?;

        if self
            .request_repo
            .pending_exists_for_shift(username, shift_id)
            .await?
        {
            return Err(DomainError::Conflict(
                "A pending request already exists for this shift".to_string(),
            ));
        }

        if let Some(replacement_username) = &replacement {
            self.staff_repo
                .find_student(replacement_username)
                .await?
                .ok_or_else(|| {
                    DomainError::NotFound("Replacement staff member not found.".to_string())
                })?;
        }

        let time_slot = shift.formatted_time();
        let request = self
            .request_repo
            .create(
                NewRequest {
                    username: username.to_string(),
                    shift_id: Some(shift_id),
                    date: Some(shift.start_time),
                    time_slot: time_slot.clone(),
                    reason: reason.to_string(),
                    replacement,
                },
                self.clock.now(),
            )
            .await?;

        let details = request.formatted_slot();
        self.notifier.request_submitted(username, &details).await;

        let student = self.staff_repo.find_student(username).await?;
        let student_name = student
            .as_ref()
            .map(|s| s.display_name().to_string())
            .unwrap_or_else(|| username.to_string());
        for admin in self.staff_repo.list_admin_usernames().await? {
            self.notifier
                .admin_new_request(&admin, &student_name, username, &details)
                .await;
        }

        Ok(request)
    }

    /// Approve a pending request. Terminal.
    pub async fn approve(&self, request_id: i32) -> DomainResult<Request> {
        let request = self.pending_request(request_id).await?;

        let approved = self
            .request_repo
            .set_status(request_id, RequestStatus::Approved, self.clock.now())
            .await?;

        self.notifier
            .request_approved(&request.username, &request.formatted_slot())
            .await;

        Ok(approved)
    }

    /// Reject a pending request. Terminal.
    pub async fn reject(&self, request_id: i32) -> DomainResult<Request> {
        let request = self.pending_request(request_id).await?;

        let rejected = self
            .request_repo
            .set_status(request_id, RequestStatus::Rejected, self.clock.now())
            .await?;

        self.notifier
            .request_rejected(&request.username, &request.formatted_slot())
            .await;

        Ok(rejected)
    }

    /// Cancel a pending request. Owner only.
    pub async fn cancel(&self, request_id: i32, username: &str) -> DomainResult<Request> {
        let request = self
            .request_repo
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(ERROR_REQUEST_NOT_FOUND.to_string()))?;

        if request.username != username {
            return Err(DomainError::Unauthorized(
                "Only the owner may cancel a request".to_string(),
            ));
        }
        if request.status != RequestStatus::Pending {
            return Err(DomainError::FailedPrecondition(format!(
                "Cannot cancel a request with status: {:?}",
                request.status
            )));
        }

        self.request_repo
            .set_status(request_id, RequestStatus::Cancelled, self.clock.now())
            .await
    }

    pub async fn list_for_staff(&self, username: &str) -> DomainResult<Vec<Request>> {
        self.request_repo.list_for_staff(username).await
    }

    pub async fn list_all(&self) -> DomainResult<Vec<Request>> {
        self.request_repo.list_all().await
    }

    pub async fn count_pending(&self) -> DomainResult<i64> {
        self.request_repo.count_pending().await
    }

    /// Upcoming allocated shifts the caller could file a request against.
    /// Shifts that already carry a pending request are excluded.
    pub async fn requestable_shifts(&self, username: &str) -> DomainResult<Vec<RequestableShift>> {
        let now = self.clock.now();
        let horizon = now.date() + Duration::days(REQUEST_HORIZON_DAYS);

        let shifts = self
            .schedule_repo
            .shifts_for_staff_between(username, now.date(), horizon)
            .await?;

        let mut result = Vec::new();
        for shift in shifts {
            if self
                .request_repo
                .pending_exists_for_shift(username, shift.id)
                .await?
            {
                continue;
            }
            result.push(RequestableShift {
                id: shift.id,
                day: shift.date.format("%a").to_string(),
                date: shift.date.format("%d %b").to_string(),
                time: shift.formatted_time(),
            });
        }

        Ok(result)
    }

    /// Other active assistants who could stand in for the caller.
    pub async fn replacements(&self, username: &str) -> DomainResult<Vec<ReplacementCandidate>> {
        let assistants = self.staff_repo.list_active_help_desk_assistants().await?;
        let usernames: Vec<String> = assistants
            .into_iter()
            .map(|assistant| assistant.username)
            .filter(|candidate| candidate != username)
            .collect();

        let students = self.staff_repo.find_students(&usernames).await?;
        Ok(students
            .into_iter()
            .map(|student| ReplacementCandidate {
                id: student.username.clone(),
                name: student.display_name().to_string(),
            })
            .collect())
    }

    async fn pending_request(&self, request_id: i32) -> DomainResult<Request> {
        let request = self
            .request_repo
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(ERROR_REQUEST_NOT_FOUND.to_string()))?;

        if request.status != RequestStatus::Pending {
            return Err(DomainError::FailedPrecondition(format!(
                "Request is not pending (status: {:?})",
                request.status
            )));
        }

        Ok(request)
    }
}
