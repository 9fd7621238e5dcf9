//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers never let an error escape unconverted: every failure becomes a
//! typed error with a user-facing message.

pub mod handlers;
pub mod services;

mod result;

pub use handlers::{
    CreateCourseCommand, CreateCourseHandler, EnrollInCourseCommand, EnrollInCourseHandler,
    EnrollmentOutcome,
};
pub use result::{ActionResult, ActionStatus};
pub use services::{
    CustomerProvisioner, PaymentPlanProvisioner, ProvisioningError, RequestGuard, Requirement,
};
