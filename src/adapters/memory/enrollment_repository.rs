//! In-memory enrollment repository.
//!
//! A single write lock stands in for the row lock the database takes, so
//! `begin_attempt` is atomic here too. Updates can be made to fail to
//! exercise compensation paths.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::enrollment::{Enrollment, EnrollmentAttempt};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::EnrollmentRepository;

/// In-memory storage for enrollments, keyed by (user, course)
#[derive(Debug, Clone, Default)]
pub struct InMemoryEnrollmentRepository {
    enrollments: Arc<RwLock<HashMap<(UserId, CourseId), Enrollment>>>,
    fail_updates: Arc<AtomicBool>,
}

impl InMemoryEnrollmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `update` fail with a database error.
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Store an enrollment directly (test seeding).
    pub async fn insert(&self, enrollment: Enrollment) {
        self.enrollments.write().await.insert(
            (enrollment.user_id.clone(), enrollment.course_id),
            enrollment,
        );
    }

    /// Get the number of stored enrollments
    pub async fn count(&self) -> usize {
        self.enrollments.read().await.len()
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryEnrollmentRepository {
    async fn begin_attempt(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
        amount_cents: i64,
    ) -> Result<EnrollmentAttempt, DomainError> {
        let mut enrollments = self.enrollments.write().await;
        let key = (user_id.clone(), *course_id);

        let attempt = Enrollment::begin_attempt(
            enrollments.get(&key).cloned(),
            user_id.clone(),
            *course_id,
            amount_cents,
            Timestamp::now(),
        );

        if attempt.needs_write() {
            enrollments.insert(key, attempt.enrollment().clone());
        }

        Ok(attempt)
    }

    async fn find_by_user_and_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, DomainError> {
        Ok(self
            .enrollments
            .read()
            .await
            .get(&(user_id.clone(), *course_id))
            .cloned())
    }

    async fn update(&self, enrollment: &Enrollment) -> Result<(), DomainError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(DomainError::database("Failed to update enrollment: connection reset"));
        }

        let mut enrollments = self.enrollments.write().await;
        let key = (enrollment.user_id.clone(), enrollment.course_id);
        match enrollments.get_mut(&key) {
            Some(stored) if stored.id == enrollment.id => {
                *stored = enrollment.clone();
                Ok(())
            }
            _ => Err(DomainError::new(
                ErrorCode::EnrollmentNotFound,
                format!("Enrollment not found: {}", enrollment.id),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enrollment::EnrollmentStatus;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[tokio::test]
    async fn repeated_attempts_reuse_one_row() {
        let repo = InMemoryEnrollmentRepository::new();
        let course_id = CourseId::new();

        let first = repo.begin_attempt(&user(), &course_id, 1000).await.unwrap();
        let second = repo.begin_attempt(&user(), &course_id, 2000).await.unwrap();

        assert_eq!(first.enrollment().id, second.enrollment().id);
        assert_eq!(second.enrollment().amount_cents, 2000);
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn active_row_is_returned_untouched() {
        let repo = InMemoryEnrollmentRepository::new();
        let course_id = CourseId::new();
        let mut enrollment = Enrollment::pending(user(), course_id, 1000, Timestamp::now());
        enrollment.status = EnrollmentStatus::Active;
        repo.insert(enrollment.clone()).await;

        let attempt = repo.begin_attempt(&user(), &course_id, 5000).await.unwrap();

        assert_eq!(attempt, EnrollmentAttempt::AlreadyActive(enrollment));
    }

    #[tokio::test]
    async fn update_can_be_made_to_fail() {
        let repo = InMemoryEnrollmentRepository::new();
        let attempt = repo.begin_attempt(&user(), &CourseId::new(), 1000).await.unwrap();
        repo.fail_updates(true);

        let err = repo.update(attempt.enrollment()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
