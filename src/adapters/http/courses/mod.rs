//! HTTP adapter for course endpoints.
//!
//! - `POST /api/courses` - Create a course (admin only)
//! - `POST /api/courses/:course_id/enroll` - Start checkout for a course

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{CourseCreatedResponse, CreateCourseRequest};
pub use handlers::{CourseApiError, CoursesAppState, EnrollmentApiError};
pub use routes::{course_router, course_routes};
