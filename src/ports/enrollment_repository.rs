//! Enrollment repository port.
//!
//! # Design
//!
//! - **One row per (user, course)**: the store enforces uniqueness
//! - **Attempts are atomic**: `begin_attempt` reads and writes the row in a
//!   single committed transaction, no external call happens inside it

use async_trait::async_trait;

use crate::domain::enrollment::{Enrollment, EnrollmentAttempt};
use crate::domain::foundation::{CourseId, DomainError, UserId};

/// Repository port for Enrollment persistence.
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Resolve an enrollment attempt and persist it.
    ///
    /// Locks the existing (user, course) row if there is one, applies
    /// `Enrollment::begin_attempt`, writes the Pending row and commits.
    /// An Active row is returned untouched.
    async fn begin_attempt(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
        amount_cents: i64,
    ) -> Result<EnrollmentAttempt, DomainError>;

    /// Find the enrollment for a user and course.
    async fn find_by_user_and_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, DomainError>;

    /// Update an existing enrollment's status and amount.
    ///
    /// # Errors
    ///
    /// - `EnrollmentNotFound` if the enrollment doesn't exist
    async fn update(&self, enrollment: &Enrollment) -> Result<(), DomainError>;
}
