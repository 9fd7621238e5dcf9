//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Session validation (JWT, mock)
//! - `http` - axum REST API
//! - `memory` - In-memory repositories
//! - `postgres` - PostgreSQL repositories
//! - `rate_limiter` - Fixed-window limiter (in-memory, Redis)
//! - `stripe` - Payment provider (Stripe, mock)

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod rate_limiter;
pub mod stripe;

pub use auth::{JwtConfig, JwtSessionValidator, MockSessionValidator};
pub use memory::{InMemoryCourseRepository, InMemoryEnrollmentRepository, InMemoryUserRepository};
pub use postgres::{PostgresCourseRepository, PostgresEnrollmentRepository, PostgresUserRepository};
pub use rate_limiter::{InMemoryRateLimiter, RateLimitConfig, RedisRateLimiter};
pub use stripe::{MockPaymentProvider, StripeConfig, StripePaymentAdapter};
