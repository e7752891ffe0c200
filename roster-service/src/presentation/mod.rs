pub mod schedule_grid;
pub mod volunteer;

pub use schedule_grid::{GridDay, GridShift, GridStaff, ScheduleGrid, ScheduleGridBuilder};
pub use volunteer::{
    ActionGate, NextShift, TimeTrackingActions, TimeTrackingSnapshot, UpcomingShift,
    VolunteerDashboard, VolunteerStudent,
};
