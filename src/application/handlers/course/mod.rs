//! Course handlers.

mod create_course;

pub use create_course::{CreateCourseCommand, CreateCourseHandler};
