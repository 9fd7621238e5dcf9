//! HTTP middleware for axum.
//!
//! - `auth` - Authentication middleware and the caller extractor

pub mod auth;

pub use auth::{auth_middleware, AuthState, OptionalAuth};
