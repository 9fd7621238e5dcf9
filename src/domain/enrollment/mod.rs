//! Enrollment domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - Enrollment entity and the per-attempt decision
//! - `status` - EnrollmentStatus state machine
//! - `errors` - EnrollmentError returned by the checkout flow

mod aggregate;
mod errors;
mod status;

pub use aggregate::{Enrollment, EnrollmentAttempt};
pub use errors::{EnrollmentError, GENERIC_FAILURE_MESSAGE};
pub use status::EnrollmentStatus;
