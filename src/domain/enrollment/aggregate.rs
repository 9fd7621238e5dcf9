//! Enrollment aggregate.
//!
//! One row per (user, course). Every enrollment attempt either short-circuits
//! on an Active row or moves the row to Pending with the course's price at
//! that moment.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CourseId, EnrollmentId, StateMachine, Timestamp, UserId, ValidationError,
};

use super::EnrollmentStatus;

/// A user's relationship to a course.
///
/// # Invariants
///
/// - (`user_id`, `course_id`) is unique
/// - `amount_cents` is the course price captured by the latest attempt
/// - status changes follow `EnrollmentStatus` transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub status: EnrollmentStatus,
    pub amount_cents: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What an enrollment attempt resolved to inside the store transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentAttempt {
    /// The user already has access; nothing was written.
    AlreadyActive(Enrollment),
    /// The row now sits in Pending with a fresh price snapshot.
    Pending(Enrollment),
}

impl EnrollmentAttempt {
    /// The enrollment row, whichever way the attempt went.
    pub fn enrollment(&self) -> &Enrollment {
        match self {
            EnrollmentAttempt::AlreadyActive(e) | EnrollmentAttempt::Pending(e) => e,
        }
    }

    /// Returns true when the attempt wrote a row that must be persisted.
    pub fn needs_write(&self) -> bool {
        matches!(self, EnrollmentAttempt::Pending(_))
    }
}

impl Enrollment {
    /// Creates a fresh Pending enrollment.
    pub fn pending(user_id: UserId, course_id: CourseId, amount_cents: i64, now: Timestamp) -> Self {
        Self {
            id: EnrollmentId::new(),
            user_id,
            course_id,
            status: EnrollmentStatus::Pending,
            amount_cents,
            created_at: now,
            updated_at: now,
        }
    }

    /// Decides the outcome of an enrollment attempt.
    ///
    /// `existing` is the row currently stored for (user, course), read under
    /// the same transaction that will persist the result.
    pub fn begin_attempt(
        existing: Option<Enrollment>,
        user_id: UserId,
        course_id: CourseId,
        amount_cents: i64,
        now: Timestamp,
    ) -> EnrollmentAttempt {
        match existing {
            Some(enrollment) if enrollment.status.grants_access() => {
                EnrollmentAttempt::AlreadyActive(enrollment)
            }
            Some(mut enrollment) => {
                enrollment.status = EnrollmentStatus::Pending;
                enrollment.amount_cents = amount_cents;
                enrollment.updated_at = now;
                EnrollmentAttempt::Pending(enrollment)
            }
            None => EnrollmentAttempt::Pending(Self::pending(user_id, course_id, amount_cents, now)),
        }
    }

    /// Grants access.
    pub fn activate(&mut self) -> Result<(), ValidationError> {
        self.move_to(EnrollmentStatus::Active)
    }

    /// Abandons the attempt.
    pub fn cancel(&mut self) -> Result<(), ValidationError> {
        self.move_to(EnrollmentStatus::Cancelled)
    }

    fn move_to(&mut self, target: EnrollmentStatus) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(target)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
