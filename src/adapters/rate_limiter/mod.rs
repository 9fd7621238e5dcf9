//! Rate limiter adapters.
//!
//! ## Available Adapters
//!
//! - `InMemoryRateLimiter` - In-memory for testing and single-server
//! - `RedisRateLimiter` - Redis-backed for production multi-server
//!
//! Both share `RateLimitConfig` and the `BotDetector` heuristic.

mod bot;
mod config;
mod in_memory;
mod redis;

pub use bot::BotDetector;
pub use config::{EnforcementMode, RateLimitConfig};
pub use in_memory::InMemoryRateLimiter;
pub use redis::RedisRateLimiter;
