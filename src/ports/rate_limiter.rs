//! Rate limiting port for protecting mutating endpoints.
//!
//! Implementations count requests in a fixed window keyed by the caller's
//! fingerprint and can additionally flag suspected automated traffic.
//! In-memory storage serves tests and single-node setups; Redis serves
//! multi-node deployments.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// Port for rate limiting operations.
///
/// Implementations should be thread-safe and support concurrent access.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check if request is allowed, consuming a slot if so.
    ///
    /// Returns `Allowed` with remaining quota or `Denied` with the reason.
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError>;

    /// Get current rate limit status without consuming a slot.
    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError>;

    /// Reset rate limit for a key (admin operation).
    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError>;
}

/// Caller fingerprint to rate limit on: the signed-in user.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    /// The user the window belongs to.
    pub user_id: UserId,
    /// User agent of the request, consulted by bot detection only.
    pub user_agent: Option<String>,
}

impl RateLimitKey {
    /// Creates the key for a user.
    pub fn user(user_id: &UserId) -> Self {
        Self {
            user_id: user_id.clone(),
            user_agent: None,
        }
    }

    /// Attaches the request's user agent.
    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Returns the storage key string for this rate limit key.
    ///
    /// The user agent never takes part in the key.
    pub fn to_redis_key(&self) -> String {
        format!("ratelimit:user:{}", self.user_id)
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed; includes current status.
    Allowed(RateLimitStatus),
    /// Request is denied; includes denial details.
    Denied(RateLimitDenied),
}

impl RateLimitResult {
    /// Returns true if the request was allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }

    /// Returns true if the request was denied.
    pub fn is_denied(&self) -> bool {
        matches!(self, RateLimitResult::Denied(_))
    }
}

/// Current rate limit status.
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    /// Maximum requests allowed in the window.
    pub limit: u32,
    /// Remaining requests in the current window.
    pub remaining: u32,
    /// When the current window resets.
    pub reset_at: Timestamp,
    /// Window duration in seconds.
    pub window_secs: u32,
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The window's quota is used up.
    RateLimit,
    /// The request looks automated.
    Bot,
}

impl DenialReason {
    /// Returns true for quota denials.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, DenialReason::RateLimit)
    }
}

/// Details of a rate limit denial.
#[derive(Debug, Clone)]
pub struct RateLimitDenied {
    /// Why the request was denied.
    pub reason: DenialReason,
    /// Maximum requests allowed in the window.
    pub limit: u32,
    /// Seconds until the client should retry.
    pub retry_after_secs: u32,
    /// Human-readable message explaining the denial.
    pub message: String,
}

/// Errors that can occur during rate limiting operations.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Rate limiter backend is unavailable.
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_key_keeps_the_user_id() {
        let user_id = UserId::new("user-123").unwrap();
        let key = RateLimitKey::user(&user_id);
        assert_eq!(key.user_id, user_id);
        assert!(key.user_agent.is_none());
    }

    #[test]
    fn redis_key_is_scoped_to_the_user() {
        let key = RateLimitKey::user(&UserId::new("user-456").unwrap());
        assert_eq!(key.to_redis_key(), "ratelimit:user:user-456");
    }

    #[test]
    fn user_agent_does_not_change_storage_key() {
        let user_id = UserId::new("user-456").unwrap();
        let plain = RateLimitKey::user(&user_id);
        let with_agent = plain.clone().with_user_agent(Some("curl/8.0".to_string()));
        assert_eq!(plain.to_redis_key(), with_agent.to_redis_key());
    }

    #[test]
    fn denial_reason_distinguishes_rate_limit() {
        assert!(DenialReason::RateLimit.is_rate_limit());
        assert!(!DenialReason::Bot.is_rate_limit());
    }

    #[test]
    fn rate_limit_result_is_denied_works() {
        let denied = RateLimitDenied {
            reason: DenialReason::RateLimit,
            limit: 5,
            retry_after_secs: 30,
            message: "Rate limit exceeded".to_string(),
        };
        let result = RateLimitResult::Denied(denied);
        assert!(result.is_denied());
        assert!(!result.is_allowed());
    }
}
