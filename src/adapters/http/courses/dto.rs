//! Request and response DTOs for the course endpoints.

use serde::{Deserialize, Serialize};

use crate::application::{ActionResult, ActionStatus};
use crate::domain::course::{Course, NewCourse};

/// Body of `POST /api/courses`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    pub price_cents: i64,
    pub slug: String,
}

impl From<CreateCourseRequest> for NewCourse {
    fn from(req: CreateCourseRequest) -> Self {
        NewCourse {
            title: req.title,
            price_cents: req.price_cents,
            slug: req.slug,
        }
    }
}

/// Success body of `POST /api/courses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCreatedResponse {
    pub status: ActionStatus,
    pub message: String,
    pub course_id: String,
}

impl CourseCreatedResponse {
    pub fn new(result: ActionResult, course: &Course) -> Self {
        Self {
            status: result.status,
            message: result.message,
            course_id: course.id.to_string(),
        }
    }
}
