use async_trait::async_trait;
use shared::{DomainError, DomainResult};
use sqlx::PgPool;

use crate::domain::entities::Course;
use crate::domain::repositories::CourseRepository;

pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn list_courses(&self) -> DomainResult<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT code, name
            FROM courses
            ORDER BY code
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(courses)
    }

    async fn find_course(&self, code: &str) -> DomainResult<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT code, name
            FROM courses
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(course)
    }
}
