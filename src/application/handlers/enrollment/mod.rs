//! Enrollment handlers.

mod enroll_in_course;

pub use enroll_in_course::{EnrollInCourseCommand, EnrollInCourseHandler, EnrollmentOutcome};
