mod availability_request;
mod request_request;
mod schedule_request;
mod tracking_request;

pub use availability_request::{
    AvailableStaffParams, BatchAvailabilityRequest, BatchQueryEntry, CheckAvailabilityRequest,
};
pub use request_request::CreateRequestBody;
pub use schedule_request::{
    AddStaffRequest, AssignmentEntry, ClearScheduleRequest, GenerateScheduleRequest,
    RemoveStaffRequest, SaveScheduleRequest, ScheduleKindParams, StaffRef,
};
pub use tracking_request::{ClockInRequest, MarkMissedRequest};
