use std::sync::Arc;

use shared::Clock;

use crate::domain::repositories::{NotificationRepository, ScheduleRepository, StaffRepository};
use crate::domain::scheduler::ScheduleGenerator;
use crate::domain::services::{
    AttendanceService, AvailabilityService, RequestService, ScheduleEditor,
};
use crate::presentation::ScheduleGridBuilder;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub staff_repo: Arc<dyn StaffRepository>,
    pub schedule_repo: Arc<dyn ScheduleRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub availability: Arc<AvailabilityService>,
    pub editor: Arc<ScheduleEditor>,
    pub attendance: Arc<AttendanceService>,
    pub requests: Arc<RequestService>,
    pub generator: Arc<ScheduleGenerator>,
    pub grid: Arc<ScheduleGridBuilder>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        staff_repo: Arc<dyn StaffRepository>,
        schedule_repo: Arc<dyn ScheduleRepository>,
        notification_repo: Arc<dyn NotificationRepository>,
        availability: Arc<AvailabilityService>,
        editor: Arc<ScheduleEditor>,
        attendance: Arc<AttendanceService>,
        requests: Arc<RequestService>,
        generator: Arc<ScheduleGenerator>,
        grid: Arc<ScheduleGridBuilder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            staff_repo,
            schedule_repo,
            notification_repo,
            availability,
            editor,
            attendance,
            requests,
            generator,
            grid,
            clock,
        }
    }
}
