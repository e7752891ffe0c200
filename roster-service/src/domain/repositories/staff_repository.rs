use async_trait::async_trait;
use shared::DomainResult;

use crate::domain::entities::{CourseCapability, HelpDeskAssistant, LabAssistant, Student, User};

#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Find a user account header by username
    async fn find_user(&self, username: &str) -> DomainResult<Option<User>>;

    /// Find a student by username
    async fn find_student(&self, username: &str) -> DomainResult<Option<Student>>;

    /// Fetch several students at once, for grid rendering
    async fn find_students(&self, usernames: &[String]) -> DomainResult<Vec<Student>>;

    /// Find a help desk assistant by username
    async fn find_help_desk_assistant(
        &self,
        username: &str,
    ) -> DomainResult<Option<HelpDeskAssistant>>;

    /// Find a lab assistant by username
    async fn find_lab_assistant(&self, username: &str) -> DomainResult<Option<LabAssistant>>;

    /// All active help desk assistants
    async fn list_active_help_desk_assistants(&self) -> DomainResult<Vec<HelpDeskAssistant>>;

    /// All active lab assistants
    async fn list_active_lab_assistants(&self) -> DomainResult<Vec<LabAssistant>>;

    /// Course capabilities of one assistant
    async fn list_capabilities(&self, username: &str) -> DomainResult<Vec<CourseCapability>>;

    /// Course capabilities of every assistant, for the assignment matrices
    async fn list_all_capabilities(&self) -> DomainResult<Vec<CourseCapability>>;

    /// Usernames of all admin accounts, for admin-facing notifications
    async fn list_admin_usernames(&self) -> DomainResult<Vec<String>>;
}
