use async_trait::async_trait;
use shared::DomainResult;

use crate::domain::entities::Availability;

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Windows of one staff member on one weekday
    async fn list_for_staff_on_day(
        &self,
        username: &str,
        day_of_week: i32,
    ) -> DomainResult<Vec<Availability>>;

    /// Every window on one weekday, across all staff
    async fn list_for_day(&self, day_of_week: i32) -> DomainResult<Vec<Availability>>;

    /// Every window of the given staff members, for the assignment matrices
    async fn list_for_staff(&self, usernames: &[String]) -> DomainResult<Vec<Availability>>;
}
