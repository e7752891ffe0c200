use async_trait::async_trait;
use shared::{DomainError, DomainResult, UserKind};
use sqlx::PgPool;

use crate::domain::entities::{CourseCapability, HelpDeskAssistant, LabAssistant, Student, User};
use crate::domain::repositories::StaffRepository;

pub struct PostgresStaffRepository {
    pool: PgPool,
}

impl PostgresStaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffRepository for PostgresStaffRepository {
    async fn find_user(&self, username: &str) -> DomainResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT username, password_hash, kind
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(user)
    }

    async fn find_student(&self, username: &str) -> DomainResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT username, name, degree, profile
            FROM students
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(student)
    }

    async fn find_students(&self, usernames: &[String]) -> DomainResult<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT username, name, degree, profile
            FROM students
            WHERE username = ANY($1)
            ORDER BY username
            "#,
        )
        .bind(usernames)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(students)
    }

    async fn find_help_desk_assistant(
        &self,
        username: &str,
    ) -> DomainResult<Option<HelpDeskAssistant>> {
        let assistant = sqlx::query_as::<_, HelpDeskAssistant>(
            r#"
            SELECT username, rate, active, hours_worked, hours_minimum
            FROM help_desk_assistants
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(assistant)
    }

    async fn find_lab_assistant(&self, username: &str) -> DomainResult<Option<LabAssistant>> {
        let assistant = sqlx::query_as::<_, LabAssistant>(
            r#"
            SELECT username, active, experience
            FROM lab_assistants
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(assistant)
    }

    async fn list_active_help_desk_assistants(&self) -> DomainResult<Vec<HelpDeskAssistant>> {
        let assistants = sqlx::query_as::<_, HelpDeskAssistant>(
            r#"
            SELECT username, rate, active, hours_worked, hours_minimum
            FROM help_desk_assistants
            WHERE active = TRUE
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(assistants)
    }

    async fn list_active_lab_assistants(&self) -> DomainResult<Vec<LabAssistant>> {
        let assistants = sqlx::query_as::<_, LabAssistant>(
            r#"
            SELECT username, active, experience
            FROM lab_assistants
            WHERE active = TRUE
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(assistants)
    }

    async fn list_capabilities(&self, username: &str) -> DomainResult<Vec<CourseCapability>> {
        let capabilities = sqlx::query_as::<_, CourseCapability>(
            r#"
            SELECT id, assistant_username, course_code
            FROM course_capabilities
            WHERE assistant_username = $1
            ORDER BY course_code
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(capabilities)
    }

    async fn list_all_capabilities(&self) -> DomainResult<Vec<CourseCapability>> {
        let capabilities = sqlx::query_as::<_, CourseCapability>(
            r#"
            SELECT id, assistant_username, course_code
            FROM course_capabilities
            ORDER BY assistant_username, course_code
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(capabilities)
    }

    async fn list_admin_usernames(&self) -> DomainResult<Vec<String>> {
        let usernames: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT username
            FROM users
            WHERE kind = $1
            ORDER BY username
            "#,
        )
        .bind(UserKind::Admin)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(usernames)
    }
}
