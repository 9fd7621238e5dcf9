//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod course;
pub mod enrollment;

pub use course::{CreateCourseCommand, CreateCourseHandler};
pub use enrollment::{EnrollInCourseCommand, EnrollInCourseHandler, EnrollmentOutcome};
