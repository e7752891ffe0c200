//! Schedule generation integration tests

#[path = "common/mod.rs"]
mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use common::{
    test_monday, InMemoryStore, MockAvailabilityRepository, MockCourseRepository,
    MockScheduleRepository, MockStaffRepository,
};
use roster_service::domain::scheduler::{GenerationOptions, ScheduleGenerator};
use shared::{Clock, FixedClock, ScheduleKind};

fn build_generator(store: &Arc<InMemoryStore>) -> ScheduleGenerator {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(
        test_monday().and_hms_opt(8, 0, 0).unwrap(),
    ));
    ScheduleGenerator::new(
        Arc::new(MockStaffRepository(store.clone())),
        Arc::new(MockCourseRepository(store.clone())),
        Arc::new(MockAvailabilityRepository(store.clone())),
        Arc::new(MockScheduleRepository(store.clone())),
        clock,
        Duration::from_secs(10),
        Duration::from_secs(2),
    )
}

fn seed_full_helpdesk(store: &Arc<InMemoryStore>, staff_count: usize) {
    store.seed_course("COMP1600", "Intro to Computing");
    for i in 0..staff_count {
        let username = format!("816{:06}", i);
        store.seed_assistant(&username, &format!("Assistant {}", i), 4);
        store.seed_capability(&username, "COMP1600");
        store.seed_weekday_availability(&username);
    }
}

#[tokio::test]
async fn test_happy_path_helpdesk_generation() {
    let store = InMemoryStore::new();
    seed_full_helpdesk(&store, 10);
    let generator = build_generator(&store);

    let friday = test_monday() + ChronoDuration::days(4);
    let report = generator
        .generate(
            ScheduleKind::Helpdesk,
            test_monday(),
            friday,
            GenerationOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(report.status, "success");
    assert_eq!(report.schedule_id, Some(1));
    let details = report.details.unwrap();
    assert_eq!(details.shifts_created, 40);
    assert!(details.relaxations_applied.is_empty());

    // Every shift got at least the default floor of two staff.
    let shifts = store.shifts.read().unwrap().clone();
    assert_eq!(shifts.len(), 40);
    for shift in &shifts {
        assert!(store.allocation_count(shift.id) >= 2);
    }

    // Every shift carries the default course demand.
    let demands = store.demands.read().unwrap();
    assert_eq!(demands.len(), 40);
    assert!(demands.iter().all(|d| d.tutors_required == 2 && d.weight == 2));
}

#[tokio::test]
async fn test_single_assistant_relaxes_floor() {
    let store = InMemoryStore::new();
    seed_full_helpdesk(&store, 1);
    let generator = build_generator(&store);

    let friday = test_monday() + ChronoDuration::days(4);
    let report = generator
        .generate(
            ScheduleKind::Helpdesk,
            test_monday(),
            friday,
            GenerationOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(report.status, "success");
    let details = report.details.unwrap();
    assert!(details
        .relaxations_applied
        .contains(&"minimum_floor_reduced_to_1".to_string()));

    let shifts = store.shifts.read().unwrap().clone();
    for shift in &shifts {
        assert_eq!(store.allocation_count(shift.id), 1);
    }
}

#[tokio::test]
async fn test_generation_is_deterministic_by_counts() {
    let store = InMemoryStore::new();
    seed_full_helpdesk(&store, 6);
    let generator = build_generator(&store);

    let friday = test_monday() + ChronoDuration::days(4);
    let first = generator
        .generate(
            ScheduleKind::Helpdesk,
            test_monday(),
            friday,
            GenerationOptions::default(),
        )
        .await
        .unwrap();
    let second = generator
        .generate(
            ScheduleKind::Helpdesk,
            test_monday(),
            friday,
            GenerationOptions::default(),
        )
        .await
        .unwrap();

    let first_details = first.details.unwrap();
    let second_details = second.details.unwrap();
    assert_eq!(first_details.shifts_created, second_details.shifts_created);
    assert_eq!(
        first_details.assignments_created,
        second_details.assignments_created
    );

    // Regeneration replaced, not accumulated.
    assert_eq!(
        store.shifts.read().unwrap().len() as u64,
        second_details.shifts_created
    );
}

#[tokio::test]
async fn test_generate_then_clear_round_trip() {
    let store = InMemoryStore::new();
    seed_full_helpdesk(&store, 4);
    let generator = build_generator(&store);

    let friday = test_monday() + ChronoDuration::days(4);
    generator
        .generate(
            ScheduleKind::Helpdesk,
            test_monday(),
            friday,
            GenerationOptions::default(),
        )
        .await
        .unwrap();

    let report = generator.clear(ScheduleKind::Helpdesk).await.unwrap();
    assert_eq!(report.schedule_id, 1);
    assert_eq!(report.shifts_removed, 40);

    assert!(store.shifts.read().unwrap().is_empty());
    assert!(store.allocations.read().unwrap().is_empty());
    assert!(!store.schedules.read().unwrap()[&1].is_published);
}

#[tokio::test]
async fn test_no_assistants_reports_error() {
    let store = InMemoryStore::new();
    store.seed_course("COMP1600", "Intro to Computing");
    let generator = build_generator(&store);

    let report = generator
        .generate(
            ScheduleKind::Helpdesk,
            test_monday(),
            test_monday(),
            GenerationOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(report.status, "error");
    assert!(store.shifts.read().unwrap().is_empty());
}

#[tokio::test]
async fn test_lab_generation_uses_blocks() {
    let store = InMemoryStore::new();
    store.seed_course("COMP1600", "Intro to Computing");
    for i in 0..4 {
        let username = format!("817{:06}", i);
        store.seed_lab_assistant(&username, &format!("Lab Assistant {}", i), i % 2 == 0);
        for day in 0..6 {
            store.seed_availability(&username, day, 8, 20);
        }
    }
    let generator = build_generator(&store);

    let saturday = test_monday() + ChronoDuration::days(5);
    let report = generator
        .generate(
            ScheduleKind::Lab,
            test_monday(),
            saturday,
            GenerationOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(report.status, "success");
    assert_eq!(report.schedule_id, Some(2));
    let details = report.details.unwrap();
    // Six operating days with three four-hour blocks each.
    assert_eq!(details.shifts_created, 18);

    let shifts = store.shifts.read().unwrap();
    assert!(shifts
        .iter()
        .all(|s| (s.end_time - s.start_time).num_hours() == 4));
}

#[tokio::test]
async fn test_maximum_staff_cap_is_respected() {
    let store = InMemoryStore::new();
    seed_full_helpdesk(&store, 6);
    let generator = build_generator(&store);

    let options = GenerationOptions {
        minimum_staff: 1,
        maximum_staff: Some(1),
        ..Default::default()
    };
    let report = generator
        .generate(ScheduleKind::Helpdesk, test_monday(), test_monday(), options)
        .await
        .unwrap();

    assert_eq!(report.status, "success");
    let shifts = store.shifts.read().unwrap().clone();
    for shift in &shifts {
        assert_eq!(store.allocation_count(shift.id), 1);
    }
}
