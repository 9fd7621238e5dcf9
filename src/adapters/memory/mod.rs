//! In-memory repository adapters.
//!
//! Used by unit and integration tests in place of PostgreSQL.

mod course_repository;
mod enrollment_repository;
mod user_repository;

pub use course_repository::InMemoryCourseRepository;
pub use enrollment_repository::InMemoryEnrollmentRepository;
pub use user_repository::InMemoryUserRepository;
