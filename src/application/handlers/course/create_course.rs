//! CreateCourseHandler - Command handler for admin course creation.

use std::sync::Arc;

use crate::application::services::{RequestGuard, Requirement};
use crate::application::ActionResult;
use crate::domain::course::{Course, CourseError, NewCourse};
use crate::domain::foundation::{AuthenticatedUser, CourseId};
use crate::ports::CourseRepository;

/// Command to create a course.
#[derive(Debug, Clone)]
pub struct CreateCourseCommand {
    /// Signed-in caller, if any.
    pub caller: Option<AuthenticatedUser>,
    /// User agent of the originating request.
    pub user_agent: Option<String>,
    pub payload: NewCourse,
}

/// Handler for creating courses.
///
/// Courses start without a payment plan; one is provisioned on the first
/// enrollment attempt.
pub struct CreateCourseHandler {
    guard: Arc<RequestGuard>,
    courses: Arc<dyn CourseRepository>,
}

impl CreateCourseHandler {
    pub fn new(guard: Arc<RequestGuard>, courses: Arc<dyn CourseRepository>) -> Self {
        Self { guard, courses }
    }

    /// Creates the course, returning it or the typed failure.
    pub async fn execute(&self, cmd: CreateCourseCommand) -> Result<Course, CourseError> {
        // 1. Admin + rate limit
        let admin = self
            .guard
            .admit(cmd.caller, Requirement::Admin, cmd.user_agent)
            .await?;

        // 2. Validate
        let payload = cmd.payload.validate().map_err(|e| {
            tracing::debug!(user_id = %admin.id, error = %e, "Rejected course payload");
            CourseError::InvalidInput
        })?;

        // 3. Persist with no payment plan
        let course = Course::create(CourseId::new(), admin.id.clone(), payload);
        self.courses.save(&course).await.map_err(|e| {
            tracing::error!(user_id = %admin.id, slug = %course.slug, error = %e, "Failed to save course");
            CourseError::operation_failed(e.message)
        })?;

        tracing::info!(
            course_id = %course.id,
            user_id = %admin.id,
            slug = %course.slug,
            price_cents = course.price_cents,
            "Course created"
        );

        Ok(course)
    }

    /// Creates the course and folds the outcome into a result object.
    pub async fn handle(&self, cmd: CreateCourseCommand) -> ActionResult {
        match self.execute(cmd).await {
            Ok(_) => ActionResult::success("Course created successfully"),
            Err(err) => ActionResult::error(err.message()),
        }
    }
}
