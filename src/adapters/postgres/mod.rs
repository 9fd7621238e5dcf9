//! PostgreSQL adapters.
//!
//! Implementations of the repository ports backed by `sqlx::PgPool`.
//! Schema lives in `migrations/`.

mod course_repository;
mod enrollment_repository;
mod user_repository;

pub use course_repository::PostgresCourseRepository;
pub use enrollment_repository::PostgresEnrollmentRepository;
pub use user_repository::PostgresUserRepository;
