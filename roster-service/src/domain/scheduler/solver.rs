//! Deterministic weighted-shortfall solver.
//!
//! Minimizes sum over (shift, course) of max(0, d - assigned_capable) * w
//! subject to availability, the per-shift floor and optional ceiling, the
//! per-staff shift floor, and the per-(shift, course) demand cap. On
//! infeasibility the hard constraints are relaxed in a fixed ladder:
//! drop the per-staff floor, drop the ceiling, then walk the per-shift
//! floor down toward 1. Every applied relaxation is reported.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::domain::scheduler::problem::AssignmentProblem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relaxation {
    StaffFloorDropped,
    MaximumDropped,
    MinimumFloorReducedTo(u32),
}

impl Relaxation {
    pub fn label(&self) -> String {
        match self {
            Relaxation::StaffFloorDropped => "staff_floor_dropped".to_string(),
            Relaxation::MaximumDropped => "maximum_staff_dropped".to_string(),
            Relaxation::MinimumFloorReducedTo(floor) => {
                format!("minimum_floor_reduced_to_{}", floor)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveFailure {
    /// No assignment satisfies the hard constraints, even fully relaxed
    Infeasible,
    /// The wall-time budget ran out
    Timeout,
}

#[derive(Debug)]
pub struct SolverOutcome {
    /// Assigned staff indices per slot
    pub assignments: Vec<Vec<usize>>,
    /// Residual weighted shortfall
    pub objective: u64,
    pub relaxations: Vec<Relaxation>,
    /// Per-shift floor actually enforced
    pub effective_minimum: u32,
}

#[derive(Debug, Clone, Copy)]
struct SolveConfig {
    staff_floor: bool,
    maximum: Option<u32>,
    floor: u32,
}

enum AttemptError {
    Infeasible,
    Timeout,
}

pub struct CoverageSolver {
    time_budget: Duration,
}

impl CoverageSolver {
    pub fn new(time_budget: Duration) -> Self {
        Self { time_budget }
    }

    pub fn solve(&self, problem: &AssignmentProblem) -> Result<SolverOutcome, SolveFailure> {
        let started = Instant::now();

        for (config, relaxations) in self.ladder(problem) {
            match self.attempt(problem, &config, started) {
                Ok((assignments, objective)) => {
                    return Ok(SolverOutcome {
                        assignments,
                        objective,
                        relaxations,
                        effective_minimum: config.floor,
                    });
                }
                Err(AttemptError::Timeout) => return Err(SolveFailure::Timeout),
                Err(AttemptError::Infeasible) => continue,
            }
        }

        Err(SolveFailure::Infeasible)
    }

    /// Relaxation ladder, most constrained first. Each rung keeps the
    /// relaxations of the previous one.
    fn ladder(&self, problem: &AssignmentProblem) -> Vec<(SolveConfig, Vec<Relaxation>)> {
        let floor = problem.minimum_staff.max(1);
        let mut rungs = Vec::new();

        let base = SolveConfig {
            staff_floor: true,
            maximum: problem.maximum_staff,
            floor,
        };
        rungs.push((base, Vec::new()));

        rungs.push((
            SolveConfig {
                staff_floor: false,
                ..base
            },
            vec![Relaxation::StaffFloorDropped],
        ));

        let mut relaxations = vec![Relaxation::StaffFloorDropped];
        if problem.maximum_staff.is_some() {
            relaxations.push(Relaxation::MaximumDropped);
            rungs.push((
                SolveConfig {
                    staff_floor: false,
                    maximum: None,
                    floor,
                },
                relaxations.clone(),
            ));
        }

        for reduced in (1..floor).rev() {
            let mut with_floor = relaxations.clone();
            with_floor.push(Relaxation::MinimumFloorReducedTo(reduced));
            rungs.push((
                SolveConfig {
                    staff_floor: false,
                    maximum: None,
                    floor: reduced,
                },
                with_floor,
            ));
        }

        rungs
    }

    fn attempt(
        &self,
        problem: &AssignmentProblem,
        config: &SolveConfig,
        started: Instant,
    ) -> Result<(Vec<Vec<usize>>, u64), AttemptError> {
        self.check_deadline(started)?;

        let staff_count = problem.staff_count();
        let slot_count = problem.slot_count();
        let course_count = problem.courses.len();

        // Cheap necessary conditions before constructing anything.
        if let Some(maximum) = config.maximum {
            if maximum < config.floor {
                return Err(AttemptError::Infeasible);
            }
        }
        for j in 0..slot_count {
            let available = (0..staff_count)
                .filter(|&i| problem.availability[i][j])
                .count() as u32;
            if available < config.floor {
                return Err(AttemptError::Infeasible);
            }
        }
        if config.staff_floor {
            for (i, candidate) in problem.staff.iter().enumerate() {
                let available = (0..slot_count)
                    .filter(|&j| problem.availability[i][j])
                    .count() as u32;
                if available < candidate.min_shifts {
                    return Err(AttemptError::Infeasible);
                }
            }
        }

        let mut state = SolveState {
            assigned: vec![vec![false; slot_count]; staff_count],
            load: vec![0u32; staff_count],
            count: vec![0u32; slot_count],
            coverage: vec![vec![0u32; course_count]; slot_count],
        };

        // Phase 1: per-staff floors, hardest staff first.
        if config.staff_floor {
            let mut order: Vec<usize> = (0..staff_count).collect();
            order.sort_by_key(|&i| {
                let available = (0..slot_count)
                    .filter(|&j| problem.availability[i][j])
                    .count();
                (available, problem.staff[i].username.clone())
            });

            for i in order {
                while state.load[i] < problem.staff[i].min_shifts {
                    self.check_deadline(started)?;
                    let candidate = (0..slot_count)
                        .filter(|&j| state.can_add(problem, config, i, j))
                        .max_by_key(|&j| {
                            (
                                state.gain(problem, i, j),
                                state.count[j] < config.floor,
                                std::cmp::Reverse(state.count[j]),
                                std::cmp::Reverse(j),
                            )
                        });
                    match candidate {
                        Some(j) => state.add(problem, i, j),
                        None => return Err(AttemptError::Infeasible),
                    }
                }
            }
        }

        // Phase 2: per-shift floors.
        for j in 0..slot_count {
            while state.count[j] < config.floor {
                self.check_deadline(started)?;
                let candidate = (0..staff_count)
                    .filter(|&i| state.can_add(problem, config, i, j))
                    .min_by_key(|&i| {
                        (
                            std::cmp::Reverse(state.gain(problem, i, j)),
                            state.load[i],
                            problem.staff[i].username.clone(),
                        )
                    });
                match candidate {
                    Some(i) => state.add(problem, i, j),
                    None => return Err(AttemptError::Infeasible),
                }
            }
        }

        // Phase 3: burn down the remaining weighted shortfall.
        loop {
            self.check_deadline(started)?;
            let mut best: Option<(u64, bool, u32, usize, usize)> = None;
            for j in 0..slot_count {
                for i in 0..staff_count {
                    if !state.can_add(problem, config, i, j) {
                        continue;
                    }
                    let gain = state.gain(problem, i, j);
                    if gain == 0 {
                        continue;
                    }
                    let under_preferred = state.count[j] < problem.preferred_staff;
                    let key = (gain, under_preferred, state.load[i], i, j);
                    let better = match &best {
                        None => true,
                        Some((bg, bp, bl, bi, _)) => {
                            (key.0, key.1, std::cmp::Reverse(key.2), std::cmp::Reverse(key.3))
                                > (*bg, *bp, std::cmp::Reverse(*bl), std::cmp::Reverse(*bi))
                        }
                    };
                    if better {
                        best = Some(key);
                    }
                }
            }
            match best {
                Some((_, _, _, i, j)) => state.add(problem, i, j),
                None => break,
            }
        }

        let assignments = (0..slot_count)
            .map(|j| {
                (0..staff_count)
                    .filter(|&i| state.assigned[i][j])
                    .collect()
            })
            .collect();

        Ok((assignments, state.objective(problem)))
    }

    fn check_deadline(&self, started: Instant) -> Result<(), AttemptError> {
        if started.elapsed() > self.time_budget {
            Err(AttemptError::Timeout)
        } else {
            Ok(())
        }
    }
}

struct SolveState {
    assigned: Vec<Vec<bool>>,
    load: Vec<u32>,
    count: Vec<u32>,
    coverage: Vec<Vec<u32>>,
}

impl SolveState {
    /// Whether assigning staff i to slot j keeps every hard constraint.
    fn can_add(
        &self,
        problem: &AssignmentProblem,
        config: &SolveConfig,
        i: usize,
        j: usize,
    ) -> bool {
        if self.assigned[i][j] || !problem.availability[i][j] {
            return false;
        }
        if let Some(maximum) = config.maximum {
            if self.count[j] >= maximum {
                return false;
            }
        }
        // Demand cap: adding increments every capable course of i, so each
        // of them must still be under its requirement.
        for (k, capable) in problem.capability[i].iter().enumerate() {
            if *capable && self.coverage[j][k] >= problem.demand[j][k] {
                return false;
            }
        }
        if let Some(max_hours) = problem.max_consecutive_hours {
            if self.consecutive_hours_with(problem, i, j) > max_hours {
                return false;
            }
        }
        true
    }

    /// Weighted shortfall removed by assigning staff i to slot j.
    fn gain(&self, problem: &AssignmentProblem, i: usize, j: usize) -> u64 {
        problem.capability[i]
            .iter()
            .enumerate()
            .filter(|(k, capable)| **capable && self.coverage[j][*k] < problem.demand[j][*k])
            .map(|(k, _)| problem.weight[j][k] as u64)
            .sum()
    }

    fn add(&mut self, problem: &AssignmentProblem, i: usize, j: usize) {
        self.assigned[i][j] = true;
        self.load[i] += 1;
        self.count[j] += 1;
        for (k, capable) in problem.capability[i].iter().enumerate() {
            if *capable {
                self.coverage[j][k] += 1;
            }
        }
    }

    /// Length in hours of the contiguous run of assigned slots that would
    /// contain slot j on its day.
    fn consecutive_hours_with(&self, problem: &AssignmentProblem, i: usize, j: usize) -> u32 {
        let slot = &problem.slots[j];
        let step = slot.duration_hours();
        if step == 0 {
            return 0;
        }

        let assigned_hours: HashSet<u32> = problem
            .slots
            .iter()
            .enumerate()
            .filter(|(other, s)| self.assigned[i][*other] && s.date == slot.date)
            .map(|(_, s)| s.start_hour)
            .collect();

        let mut run = step;
        let mut hour = slot.start_hour;
        while hour >= step && assigned_hours.contains(&(hour - step)) {
            run += step;
            hour -= step;
        }
        let mut hour = slot.start_hour;
        while assigned_hours.contains(&(hour + step)) {
            run += step;
            hour += step;
        }
        run
    }

    fn objective(&self, problem: &AssignmentProblem) -> u64 {
        let mut total = 0u64;
        for j in 0..problem.slot_count() {
            for k in 0..problem.courses.len() {
                let shortfall = problem.demand[j][k].saturating_sub(self.coverage[j][k]);
                total += shortfall as u64 * problem.weight[j][k] as u64;
            }
        }
        total
    }
}
