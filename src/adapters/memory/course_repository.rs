//! In-memory course repository.
//!
//! Enforces slug uniqueness like the database index does.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::course::Course;
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, Timestamp};
use crate::ports::CourseRepository;

/// In-memory storage for courses
#[derive(Debug, Clone, Default)]
pub struct InMemoryCourseRepository {
    courses: Arc<RwLock<HashMap<CourseId, Course>>>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored courses
    pub async fn count(&self) -> usize {
        self.courses.read().await.len()
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn save(&self, course: &Course) -> Result<(), DomainError> {
        let mut courses = self.courses.write().await;
        if courses.values().any(|c| c.slug == course.slug) {
            return Err(DomainError::new(
                ErrorCode::CourseSlugTaken,
                format!("Slug already in use: {}", course.slug),
            ));
        }
        courses.insert(course.id, course.clone());
        Ok(())
    }

    async fn update(&self, course: &Course) -> Result<(), DomainError> {
        let mut courses = self.courses.write().await;
        match courses.get_mut(&course.id) {
            Some(stored) => {
                *stored = course.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::CourseNotFound,
                format!("Course not found: {}", course.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        Ok(self.courses.read().await.get(id).cloned())
    }

    async fn set_price_id(&self, id: &CourseId, price_id: &str) -> Result<(), DomainError> {
        let mut courses = self.courses.write().await;
        match courses.get_mut(id) {
            Some(course) => {
                course.stripe_price_id = Some(price_id.to_string());
                course.updated_at = Timestamp::now();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::CourseNotFound,
                format!("Course not found: {}", id),
            )),
        }
    }
}
