//! Assignment problem materialization.
//!
//! Turns staff, availability, capability and demand data into the dense
//! matrices the solver works on. Decision variable x[i][j] means "staff i
//! works shift j".

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::entities::Availability;
use crate::domain::scheduler::grid::ShiftSlot;

/// Per-course demand override for generation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CourseDemandOverride {
    pub course_code: String,
    pub tutors_required: u32,
    pub weight: Option<u32>,
}

/// Options accepted by the generator.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerationOptions {
    /// Hard floor of staff per shift
    #[serde(default = "default_minimum_staff")]
    pub minimum_staff: u32,
    /// Soft target of staff per shift
    #[serde(default = "default_preferred_staff")]
    pub preferred_staff: u32,
    /// Optional hard cap of staff per shift
    #[serde(default)]
    pub maximum_staff: Option<u32>,
    /// Reserved
    #[serde(default)]
    pub break_duration_minutes: Option<u32>,
    /// Longest run of back-to-back hours a staff member may work per day;
    /// enforced when set
    #[serde(default)]
    pub max_consecutive_hours: Option<u32>,
    /// Per-course demand overrides; every active course defaults to
    /// 2 tutors with weight 2
    #[serde(default)]
    pub course_demands: Option<Vec<CourseDemandOverride>>,
}

fn default_minimum_staff() -> u32 {
    2
}

fn default_preferred_staff() -> u32 {
    2
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            minimum_staff: default_minimum_staff(),
            preferred_staff: default_preferred_staff(),
            maximum_staff: None,
            break_duration_minutes: None,
            max_consecutive_hours: None,
            course_demands: None,
        }
    }
}

pub const DEFAULT_TUTORS_REQUIRED: u32 = 2;

/// One eligible staff member with their weekly shift floor.
#[derive(Debug, Clone)]
pub struct StaffCandidate {
    pub username: String,
    pub min_shifts: u32,
}

#[derive(Debug)]
pub struct AssignmentProblem {
    pub staff: Vec<StaffCandidate>,
    pub slots: Vec<ShiftSlot>,
    pub courses: Vec<String>,
    /// a[i][j]: availability fully covers slot j for staff i
    pub availability: Vec<Vec<bool>>,
    /// t[i][k]: staff i is capable of course k
    pub capability: Vec<Vec<bool>>,
    /// d[j][k]: tutors required
    pub demand: Vec<Vec<u32>>,
    /// w[j][k]: shortfall weight
    pub weight: Vec<Vec<u32>>,
    pub minimum_staff: u32,
    pub preferred_staff: u32,
    pub maximum_staff: Option<u32>,
    pub max_consecutive_hours: Option<u32>,
}

impl AssignmentProblem {
    /// Build the matrices.
    ///
    /// `capabilities` maps username -> capable course codes; an empty map
    /// entry (or a missing one) combined with `all_capable` covers the lab
    /// pool, where every assistant tutors every course.
    pub fn build(
        staff: Vec<StaffCandidate>,
        slots: Vec<ShiftSlot>,
        courses: Vec<String>,
        availabilities: &[Availability],
        capabilities: &HashMap<String, HashSet<String>>,
        all_capable: bool,
        options: &GenerationOptions,
    ) -> Self {
        let mut windows: HashMap<&str, Vec<&Availability>> = HashMap::new();
        for availability in availabilities {
            windows
                .entry(availability.username.as_str())
                .or_default()
                .push(availability);
        }

        let availability_matrix: Vec<Vec<bool>> = staff
            .iter()
            .map(|candidate| {
                let staff_windows = windows
                    .get(candidate.username.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                slots
                    .iter()
                    .map(|slot| covers_slot(staff_windows, slot))
                    .collect()
            })
            .collect();

        let capability_matrix: Vec<Vec<bool>> = staff
            .iter()
            .map(|candidate| {
                courses
                    .iter()
                    .map(|course| {
                        all_capable
                            || capabilities
                                .get(&candidate.username)
                                .map(|set| set.contains(course))
                                .unwrap_or(false)
                    })
                    .collect()
            })
            .collect();

        let mut required: HashMap<&str, (u32, u32)> = HashMap::new();
        if let Some(overrides) = &options.course_demands {
            for demand_override in overrides {
                let tutors = demand_override.tutors_required.max(1);
                let weight = demand_override.weight.unwrap_or(tutors).max(1);
                required.insert(demand_override.course_code.as_str(), (tutors, weight));
            }
        }

        let per_course: Vec<(u32, u32)> = courses
            .iter()
            .map(|course| {
                required
                    .get(course.as_str())
                    .copied()
                    .unwrap_or((DEFAULT_TUTORS_REQUIRED, DEFAULT_TUTORS_REQUIRED))
            })
            .collect();

        let demand = vec![per_course.iter().map(|(d, _)| *d).collect::<Vec<_>>(); slots.len()];
        let weight = vec![per_course.iter().map(|(_, w)| *w).collect::<Vec<_>>(); slots.len()];

        Self {
            staff,
            slots,
            courses,
            availability: availability_matrix,
            capability: capability_matrix,
            demand,
            weight,
            minimum_staff: options.minimum_staff,
            preferred_staff: options.preferred_staff,
            maximum_staff: options.maximum_staff,
            max_consecutive_hours: options.max_consecutive_hours,
        }
    }

    pub fn staff_count(&self) -> usize {
        self.staff.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

/// A window covers a slot when it spans the slot's whole time range on the
/// slot's weekday.
fn covers_slot(windows: &[&Availability], slot: &ShiftSlot) -> bool {
    let start = slot.start_time().time();
    let end = slot.end_time().time();

    // Grid slots never cross midnight in practice; a wrapped end time
    // cannot be covered by a same-day window.
    if end <= start {
        return false;
    }

    windows.iter().any(|window| {
        window.day_of_week == slot.day_of_week
            && window.start_time <= start
            && end <= window.end_time
    })
}
