//! Constraint-based schedule generation.
//!
//! `ScheduleGenerator` builds the shift grid for a date range, materializes
//! the assignment problem from the store, runs the coverage solver, and
//! atomically replaces the primary schedule's shifts and allocations in the
//! requested window.

pub mod grid;
pub mod problem;
pub mod solver;

pub use grid::{build_grid, ShiftSlot};
pub use problem::{CourseDemandOverride, GenerationOptions, StaffCandidate};
pub use solver::{CoverageSolver, Relaxation, SolveFailure};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::Serialize;
use shared::{Clock, DomainResult, ScheduleKind};
use utoipa::ToSchema;

use crate::domain::repositories::{
    AvailabilityRepository, CourseRepository, NewCourseDemand, NewShift, ScheduleRepository,
    StaffRepository,
};

use problem::AssignmentProblem;

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerationDetails {
    #[schema(value_type = String, example = "2025-03-10")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, example = "2025-03-14")]
    pub end_date: NaiveDate,
    pub shifts_created: u64,
    pub assignments_created: u64,
    pub relaxations_applied: Vec<String>,
}

/// Outcome of a generation run. Solver infeasibility and timeouts are
/// reported here with `status = "error"`, not as transport failures.
#[derive(Debug, Serialize, ToSchema)]
pub struct GenerationReport {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<GenerationDetails>,
}

impl GenerationReport {
    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            schedule_id: None,
            details: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearReport {
    pub schedule_id: i32,
    pub shifts_removed: u64,
    pub allocations_removed: u64,
}

pub struct ScheduleGenerator {
    staff_repo: Arc<dyn StaffRepository>,
    course_repo: Arc<dyn CourseRepository>,
    availability_repo: Arc<dyn AvailabilityRepository>,
    schedule_repo: Arc<dyn ScheduleRepository>,
    clock: Arc<dyn Clock>,
    time_budget: Duration,
    slow_warn: Duration,
}

impl ScheduleGenerator {
    pub fn new(
        staff_repo: Arc<dyn StaffRepository>,
        course_repo: Arc<dyn CourseRepository>,
        availability_repo: Arc<dyn AvailabilityRepository>,
        schedule_repo: Arc<dyn ScheduleRepository>,
        clock: Arc<dyn Clock>,
        time_budget: Duration,
        slow_warn: Duration,
    ) -> Self {
        Self {
            staff_repo,
            course_repo,
            availability_repo,
            schedule_repo,
            clock,
            time_budget,
            slow_warn,
        }
    }

    /// Generate the primary schedule of `kind` for [start, end].
    pub async fn generate(
        &self,
        kind: ScheduleKind,
        start_date: NaiveDate,
        end_date: NaiveDate,
        options: GenerationOptions,
    ) -> DomainResult<GenerationReport> {
        let slots = build_grid(kind, start_date, end_date)?;
        if slots.is_empty() {
            return Ok(GenerationReport::error(
                "No operating days fall inside the requested range",
            ));
        }

        let (staff, capabilities, all_capable) = self.eligible_staff(kind).await?;
        if staff.is_empty() {
            return Ok(GenerationReport::error("No active assistants found"));
        }

        let courses: Vec<String> = {
            let mut codes: Vec<String> = self
                .course_repo
                .list_courses()
                .await?
                .into_iter()
                .map(|course| course.code)
                .collect();
            codes.sort();
            codes
        };

        let usernames: Vec<String> = staff.iter().map(|s| s.username.clone()).collect();
        let availabilities = self.availability_repo.list_for_staff(&usernames).await?;

        let problem = AssignmentProblem::build(
            staff,
            slots,
            courses,
            &availabilities,
            &capabilities,
            all_capable,
            &options,
        );

        tracing::info!(
            kind = ?kind,
            staff = problem.staff_count(),
            shifts = problem.slot_count(),
            "Solving assignment problem"
        );

        let started = Instant::now();
        let outcome = match CoverageSolver::new(self.time_budget).solve(&problem) {
            Ok(outcome) => outcome,
            Err(SolveFailure::Timeout) => {
                tracing::error!(kind = ?kind, "Solver exceeded its wall-time budget");
                return Ok(GenerationReport::error("solver_timeout"));
            }
            Err(SolveFailure::Infeasible) => {
                return Ok(GenerationReport::error(
                    "Problem is infeasible with current constraints",
                ));
            }
        };
        let elapsed = started.elapsed();
        if elapsed > self.slow_warn {
            tracing::warn!(
                kind = ?kind,
                elapsed_ms = elapsed.as_millis() as u64,
                "Slow schedule solve"
            );
        }

        let now = self.clock.now();
        let schedule = self
            .schedule_repo
            .upsert_primary_schedule(kind, start_date, end_date, now)
            .await?;

        let demands: Vec<NewCourseDemand> = problem
            .courses
            .iter()
            .enumerate()
            .map(|(k, code)| NewCourseDemand {
                course_code: code.clone(),
                tutors_required: problem.demand[0][k] as i32,
                weight: problem.weight[0][k] as i32,
            })
            .collect();

        let new_shifts: Vec<NewShift> = problem
            .slots
            .iter()
            .enumerate()
            .map(|(j, slot)| NewShift {
                date: slot.date,
                start_time: slot.start_time(),
                end_time: slot.end_time(),
                demands: demands.clone(),
                assigned: outcome.assignments[j]
                    .iter()
                    .map(|&i| problem.staff[i].username.clone())
                    .collect(),
            })
            .collect();

        let (shifts_created, assignments_created) = self
            .schedule_repo
            .replace_window(schedule.id, start_date, end_date, new_shifts, now)
            .await?;

        tracing::info!(
            schedule_id = schedule.id,
            shifts_created,
            assignments_created,
            objective = outcome.objective,
            "Schedule generated"
        );

        Ok(GenerationReport {
            status: "success".to_string(),
            message: "Schedule generated successfully".to_string(),
            schedule_id: Some(schedule.id),
            details: Some(GenerationDetails {
                start_date,
                end_date,
                shifts_created,
                assignments_created,
                relaxations_applied: outcome
                    .relaxations
                    .iter()
                    .map(Relaxation::label)
                    .collect(),
            }),
        })
    }

    /// Remove every shift and allocation of the primary schedule of `kind`.
    pub async fn clear(&self, kind: ScheduleKind) -> DomainResult<ClearReport> {
        let schedule_id = kind.primary_id();
        let (shifts_removed, allocations_removed) =
            self.schedule_repo.clear_schedule(schedule_id).await?;

        tracing::info!(schedule_id, shifts_removed, allocations_removed, "Schedule cleared");

        Ok(ClearReport {
            schedule_id,
            shifts_removed,
            allocations_removed,
        })
    }

    async fn eligible_staff(
        &self,
        kind: ScheduleKind,
    ) -> DomainResult<(Vec<StaffCandidate>, HashMap<String, HashSet<String>>, bool)> {
        match kind {
            ScheduleKind::Helpdesk => {
                let mut capabilities: HashMap<String, HashSet<String>> = HashMap::new();
                for capability in self.staff_repo.list_all_capabilities().await? {
                    capabilities
                        .entry(capability.assistant_username)
                        .or_default()
                        .insert(capability.course_code);
                }

                let mut staff: Vec<StaffCandidate> = self
                    .staff_repo
                    .list_active_help_desk_assistants()
                    .await?
                    .into_iter()
                    .filter(|assistant| {
                        capabilities
                            .get(&assistant.username)
                            .map(|set| !set.is_empty())
                            .unwrap_or(false)
                    })
                    .map(|assistant| StaffCandidate {
                        min_shifts: assistant.hours_minimum.max(0) as u32,
                        username: assistant.username,
                    })
                    .collect();
                staff.sort_by(|a, b| a.username.cmp(&b.username));

                Ok((staff, capabilities, false))
            }
            ScheduleKind::Lab => {
                let mut staff: Vec<StaffCandidate> = self
                    .staff_repo
                    .list_active_lab_assistants()
                    .await?
                    .into_iter()
                    .map(|assistant| StaffCandidate {
                        username: assistant.username,
                        min_shifts: 0,
                    })
                    .collect();
                staff.sort_by(|a, b| a.username.cmp(&b.username));

                Ok((staff, HashMap::new(), true))
            }
        }
    }
}
