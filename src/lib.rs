//! Course Checkout - admin course creation and paid enrollment checkout
//!
//! Admins publish courses; signed-in users enroll through a hosted Stripe
//! checkout. Both actions share a per-user fixed-window rate limit.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
