//! Course repository port.
//!
//! # Design
//!
//! - **Slug uniqueness**: enforced by the store, surfaced as `CourseSlugTaken`
//! - **Plan pointer**: `set_price_id` only touches the payment plan column so
//!   it never races with edits to the rest of the course

use async_trait::async_trait;

use crate::domain::course::Course;
use crate::domain::foundation::{CourseId, DomainError};

/// Repository port for Course persistence.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Save a new course.
    ///
    /// # Errors
    ///
    /// - `CourseSlugTaken` if another course already uses the slug
    /// - `DatabaseError` on persistence failure
    async fn save(&self, course: &Course) -> Result<(), DomainError>;

    /// Update an existing course.
    ///
    /// # Errors
    ///
    /// - `CourseNotFound` if the course doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, course: &Course) -> Result<(), DomainError>;

    /// Find a course by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError>;

    /// Point the course at a newly provisioned payment plan.
    ///
    /// # Errors
    ///
    /// - `CourseNotFound` if the course doesn't exist
    async fn set_price_id(&self, id: &CourseId, price_id: &str) -> Result<(), DomainError>;
}
