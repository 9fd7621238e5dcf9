//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, identity, errors)
//! - `course` - Course aggregate and creation rules
//! - `enrollment` - Enrollment lifecycle for paid checkout
//! - `user` - Billing view of a platform user

pub mod course;
pub mod enrollment;
pub mod foundation;
pub mod user;
