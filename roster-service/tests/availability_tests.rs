//! Availability resolver integration tests

#[path = "common/mod.rs"]
mod common;

use std::sync::Arc;

use chrono::Duration;
use common::{
    test_monday, InMemoryStore, MockAvailabilityRepository, MockScheduleRepository,
    MockStaffRepository,
};
use roster_service::domain::services::{AvailabilityService, BatchAvailabilityQuery};
use shared::{DomainError, ScheduleKind};

fn build_service(store: &Arc<InMemoryStore>) -> AvailabilityService {
    AvailabilityService::new(
        Arc::new(MockStaffRepository(store.clone())),
        Arc::new(MockAvailabilityRepository(store.clone())),
        Arc::new(MockScheduleRepository(store.clone())),
        None,
    )
}

#[tokio::test]
async fn test_list_available_filters_by_window() {
    let store = InMemoryStore::new();
    store.seed_assistant("alice", "Alice Ali", 4);
    store.seed_availability("alice", 0, 9, 12);
    store.seed_assistant("bob", "Bob Bobb", 4);
    store.seed_availability("bob", 0, 13, 17);
    let service = build_service(&store);

    let available = service
        .list_available(ScheduleKind::Helpdesk, "Monday", "10:00 am")
        .await
        .unwrap();

    assert_eq!(available.len(), 1);
    assert_eq!(available[0].username, "alice");
    assert_eq!(available[0].availability.len(), 1);
}

#[tokio::test]
async fn test_inactive_staff_are_not_listed() {
    let store = InMemoryStore::new();
    store.seed_assistant("alice", "Alice Ali", 4);
    store.seed_availability("alice", 0, 9, 12);
    store
        .helpdesk_assistants
        .write()
        .unwrap()
        .get_mut("alice")
        .unwrap()
        .active = false;
    let service = build_service(&store);

    let available = service
        .list_available(ScheduleKind::Helpdesk, "MON", "9:00 am")
        .await
        .unwrap();
    assert!(available.is_empty());

    // The single check reports the inactive state explicitly.
    let check = service
        .is_available(ScheduleKind::Helpdesk, "alice", "MON", "9:00 am")
        .await
        .unwrap();
    assert!(!check.is_available);
    assert!(check.reason.is_some());
}

#[tokio::test]
async fn test_is_available_reports_matched_slot_and_assignment() {
    let store = InMemoryStore::new();
    store.seed_assistant("alice", "Alice Ali", 4);
    store.seed_availability("alice", 0, 9, 12);
    let schedule_id = store.seed_schedule(
        ScheduleKind::Helpdesk,
        test_monday(),
        test_monday() + Duration::days(4),
    );
    let shift_id = store.seed_shift(schedule_id, test_monday(), 9, 10);
    store.seed_allocation("alice", shift_id, schedule_id);
    let service = build_service(&store);

    let check = service
        .is_available(ScheduleKind::Helpdesk, "alice", "Monday", "9:00 am")
        .await
        .unwrap();

    assert!(check.is_available);
    assert_eq!(check.matched_slot.unwrap().start_time, "09:00");
    assert!(check.existing_assignment);

    // The hour just past the window is not covered.
    let check = service
        .is_available(ScheduleKind::Helpdesk, "alice", "Monday", "12:00 pm")
        .await
        .unwrap();
    assert!(!check.is_available);
}

#[tokio::test]
async fn test_gap_between_windows_is_unavailable() {
    let store = InMemoryStore::new();
    store.seed_assistant("alice", "Alice Ali", 4);
    store.seed_availability("alice", 0, 9, 11);
    store.seed_availability("alice", 0, 13, 15);
    let service = build_service(&store);

    for (slot, expected) in [
        ("9:00 am", true),
        ("10:00 am", true),
        ("11:00 am", false),
        ("12:00 pm", false),
        ("1:00 pm", true),
    ] {
        let check = service
            .is_available(ScheduleKind::Helpdesk, "alice", "Monday", slot)
            .await
            .unwrap();
        assert_eq!(check.is_available, expected, "slot {}", slot);
    }
}

#[tokio::test]
async fn test_unknown_staff_is_not_found() {
    let store = InMemoryStore::new();
    let service = build_service(&store);

    let error = service
        .is_available(ScheduleKind::Helpdesk, "ghost", "Monday", "9:00 am")
        .await
        .unwrap_err();
    assert!(matches!(error, DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_unknown_day_and_time_are_invalid_input() {
    let store = InMemoryStore::new();
    store.seed_assistant("alice", "Alice Ali", 4);
    let service = build_service(&store);

    let error = service
        .is_available(ScheduleKind::Helpdesk, "alice", "Someday", "9:00 am")
        .await
        .unwrap_err();
    assert!(matches!(error, DomainError::InvalidInput(_)));

    let error = service
        .is_available(ScheduleKind::Helpdesk, "alice", "Monday", "noonish")
        .await
        .unwrap_err();
    assert!(matches!(error, DomainError::InvalidInput(_)));
}

#[tokio::test]
async fn test_batch_folds_errors_into_results() {
    let store = InMemoryStore::new();
    store.seed_assistant("alice", "Alice Ali", 4);
    store.seed_availability("alice", 0, 9, 12);
    let service = build_service(&store);

    let results = service
        .batch_available(
            ScheduleKind::Helpdesk,
            vec![
                BatchAvailabilityQuery {
                    staff_id: "alice".to_string(),
                    day: "Monday".to_string(),
                    time: "9:00 am".to_string(),
                },
                BatchAvailabilityQuery {
                    staff_id: "alice".to_string(),
                    day: "Monday".to_string(),
                    time: "4:00 pm".to_string(),
                },
                BatchAvailabilityQuery {
                    staff_id: "ghost".to_string(),
                    day: "Monday".to_string(),
                    time: "9:00 am".to_string(),
                },
            ],
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert!(results[0].is_available);
    assert!(!results[1].is_available);
    assert!(!results[2].is_available);
    assert!(results[2].error.is_some());
}

#[tokio::test]
async fn test_lab_block_slots_resolve() {
    let store = InMemoryStore::new();
    store.seed_lab_assistant("dana", "Dana Dorn", true);
    store.seed_availability("dana", 5, 8, 20);
    let service = build_service(&store);

    let available = service
        .list_available(ScheduleKind::Lab, "SAT", "8am - 12pm")
        .await
        .unwrap();

    assert_eq!(available.len(), 1);
    assert_eq!(available[0].username, "dana");
}
