use async_trait::async_trait;
use shared::DomainResult;

use crate::domain::entities::Course;

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// All courses. Every one of them contributes demand to every shift
    /// unless the generation options override it.
    async fn list_courses(&self) -> DomainResult<Vec<Course>>;

    /// Find a course by code
    #[allow(dead_code)]
    async fn find_course(&self, code: &str) -> DomainResult<Option<Course>>;
}
