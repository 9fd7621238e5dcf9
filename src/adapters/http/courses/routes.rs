//! Axum router configuration for course endpoints.

use axum::{routing::post, Router};

use super::handlers::{create_course, enroll_in_course, CoursesAppState};

/// Create the course API router.
///
/// # Routes
///
/// - `POST /` - Create a course (admin only)
/// - `POST /:course_id/enroll` - Start checkout for a course
pub fn course_routes() -> Router<CoursesAppState> {
    Router::new()
        .route("/", post(create_course))
        .route("/:course_id/enroll", post(enroll_in_course))
}

/// Create the complete course module router, mounted at `/courses`.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .nest("/api", course_router())
///     .with_state(app_state);
/// ```
pub fn course_router() -> Router<CoursesAppState> {
    Router::new().nest("/courses", course_routes())
}
