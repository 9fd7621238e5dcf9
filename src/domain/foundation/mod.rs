//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, caller identity, and the error vocabulary
//! shared by the course and enrollment domains.

mod access;
mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use access::AccessDenied;
pub use auth::{AuthError, AuthenticatedUser, UserRole};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CourseId, EnrollmentId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
