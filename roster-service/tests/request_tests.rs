//! Shift-change request workflow integration tests

#[path = "common/mod.rs"]
mod common;

use std::sync::Arc;

use chrono::Duration;
use common::{
    test_monday, InMemoryStore, MockNotificationRepository, MockRequestRepository,
    MockScheduleRepository, MockStaffRepository,
};
use roster_service::domain::services::{Notifier, RequestService};
use shared::{Clock, DomainError, FixedClock, NotificationKind, RequestStatus, ScheduleKind};

fn build_service(store: &Arc<InMemoryStore>) -> RequestService {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(
        test_monday().and_hms_opt(8, 0, 0).unwrap(),
    ));
    let notifier = Arc::new(Notifier::new(
        Arc::new(MockNotificationRepository(store.clone())),
        clock.clone(),
    ));
    RequestService::new(
        Arc::new(MockRequestRepository(store.clone())),
        Arc::new(MockScheduleRepository(store.clone())),
        Arc::new(MockStaffRepository(store.clone())),
        notifier,
        clock,
    )
}

/// Alice allocated to a Tuesday 10:00 shift, with an admin on file.
fn seed_allocated_shift(store: &Arc<InMemoryStore>) -> i32 {
    store.seed_admin("a-admin");
    store.seed_assistant("alice", "Alice Ali", 4);
    store.seed_weekday_availability("alice");
    store.seed_assistant("bob", "Bob Bobb", 4);
    let schedule_id = store.seed_schedule(
        ScheduleKind::Helpdesk,
        test_monday(),
        test_monday() + Duration::days(4),
    );
    let shift_id = store.seed_shift(schedule_id, test_monday() + Duration::days(1), 10, 11);
    store.seed_allocation("alice", shift_id, schedule_id);
    shift_id
}

#[tokio::test]
async fn test_request_lifecycle_approval() {
    let store = InMemoryStore::new();
    let shift_id = seed_allocated_shift(&store);
    let service = build_service(&store);

    let request = service
        .submit("alice", shift_id, "Doctor's appointment", None)
        .await
        .unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.shift_id, Some(shift_id));

    // Submitter and admin are both notified.
    assert!(store
        .notifications_for("alice")
        .iter()
        .any(|n| n.kind == NotificationKind::Request));
    assert!(store
        .notifications_for("a-admin")
        .iter()
        .any(|n| n.kind == NotificationKind::Request && n.message.contains("Alice Ali")));

    let approved = service.approve(request.id).await.unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);
    assert!(approved.approved_at.is_some());
    assert!(store
        .notifications_for("alice")
        .iter()
        .any(|n| n.kind == NotificationKind::Approval));

    // Approval is terminal: the owner can no longer cancel.
    let error = service.cancel(request.id, "alice").await.unwrap_err();
    assert!(matches!(error, DomainError::FailedPrecondition(_)));
}

#[tokio::test]
async fn test_request_rejection_notifies_owner() {
    let store = InMemoryStore::new();
    let shift_id = seed_allocated_shift(&store);
    let service = build_service(&store);

    let request = service
        .submit("alice", shift_id, "Exam clash", None)
        .await
        .unwrap();

    let rejected = service.reject(request.id).await.unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert!(rejected.rejected_at.is_some());
    assert!(store
        .notifications_for("alice")
        .iter()
        .any(|n| n.kind == NotificationKind::Rejection));

    // A terminal request cannot be approved afterwards.
    let error = service.approve(request.id).await.unwrap_err();
    assert!(matches!(error, DomainError::FailedPrecondition(_)));
}

#[tokio::test]
async fn test_cancel_is_owner_only_and_pending_only() {
    let store = InMemoryStore::new();
    let shift_id = seed_allocated_shift(&store);
    let service = build_service(&store);

    let request = service
        .submit("alice", shift_id, "Travel", None)
        .await
        .unwrap();

    let error = service.cancel(request.id, "bob").await.unwrap_err();
    assert!(matches!(error, DomainError::Unauthorized(_)));

    let cancelled = service.cancel(request.id, "alice").await.unwrap();
    assert_eq!(cancelled.status, RequestStatus::Cancelled);

    let error = service.cancel(request.id, "alice").await.unwrap_err();
    assert!(matches!(error, DomainError::FailedPrecondition(_)));
}

#[tokio::test]
async fn test_submit_requires_allocation() {
    let store = InMemoryStore::new();
    let shift_id = seed_allocated_shift(&store);
    let service = build_service(&store);

    // Bob holds no allocation on the shift.
    let error = service
        .submit("bob", shift_id, "Not my shift", None)
        .await
        .unwrap_err();
    assert!(matches!(error, DomainError::FailedPrecondition(_)));
}

#[tokio::test]
async fn test_duplicate_pending_request_conflicts() {
    let store = InMemoryStore::new();
    let shift_id = seed_allocated_shift(&store);
    let service = build_service(&store);

    service
        .submit("alice", shift_id, "First request", None)
        .await
        .unwrap();

    let error = service
        .submit("alice", shift_id, "Second request", None)
        .await
        .unwrap_err();
    assert!(matches!(error, DomainError::Conflict(_)));
}

#[tokio::test]
async fn test_requestable_shifts_exclude_pending() {
    let store = InMemoryStore::new();
    let shift_id = seed_allocated_shift(&store);
    let second_shift = store.seed_shift(1, test_monday() + Duration::days(2), 11, 12);
    store.seed_allocation("alice", second_shift, 1);
    let service = build_service(&store);

    let shifts = service.requestable_shifts("alice").await.unwrap();
    assert_eq!(shifts.len(), 2);

    service
        .submit("alice", shift_id, "Swap please", None)
        .await
        .unwrap();

    let shifts = service.requestable_shifts("alice").await.unwrap();
    assert_eq!(shifts.len(), 1);
    assert_eq!(shifts[0].id, second_shift);
}

#[tokio::test]
async fn test_replacement_candidates_exclude_requester() {
    let store = InMemoryStore::new();
    seed_allocated_shift(&store);
    let service = build_service(&store);

    let candidates = service.replacements("alice").await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, "bob");
}

#[tokio::test]
async fn test_pending_count() {
    let store = InMemoryStore::new();
    let shift_id = seed_allocated_shift(&store);
    let service = build_service(&store);

    assert_eq!(service.count_pending().await.unwrap(), 0);

    let request = service
        .submit("alice", shift_id, "Swap please", None)
        .await
        .unwrap();
    assert_eq!(service.count_pending().await.unwrap(), 1);

    service.approve(request.id).await.unwrap();
    assert_eq!(service.count_pending().await.unwrap(), 0);
}
