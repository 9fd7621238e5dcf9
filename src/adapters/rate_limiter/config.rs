//! Rate limit configuration types.
//!
//! One fixed window applies to every keyed caller. Enforcement can run in
//! dry-run mode, where denials are logged and the request is let through.

use serde::{Deserialize, Serialize};

use crate::ports::{RateLimitKey, RateLimitResult, RateLimitStatus};

/// Whether denials are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementMode {
    /// Deny over-limit and automated requests.
    #[default]
    Live,
    /// Log what would have been denied and allow.
    DryRun,
}

/// Complete rate limit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window per key.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window duration in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u32,

    #[serde(default)]
    pub mode: EnforcementMode,

    /// Flag requests whose user agent looks automated.
    #[serde(default = "default_bot_detection")]
    pub bot_detection: bool,
}

fn default_max_requests() -> u32 {
    5
}

fn default_window_secs() -> u32 {
    60
}

fn default_bot_detection() -> bool {
    true
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            mode: EnforcementMode::Live,
            bot_detection: default_bot_detection(),
        }
    }
}

impl RateLimitConfig {
    /// Config with a custom window, mainly for tests.
    pub fn with_limit(max_requests: u32, window_secs: u32) -> Self {
        Self {
            max_requests,
            window_secs,
            ..Self::default()
        }
    }

    /// Returns true when denials are actually enforced.
    pub fn is_live(&self) -> bool {
        self.mode == EnforcementMode::Live
    }

    /// Applies the enforcement mode to a decision.
    ///
    /// In dry-run mode a denial is logged and turned into an allow carrying
    /// `status`.
    pub fn enforce(
        &self,
        key: &RateLimitKey,
        result: RateLimitResult,
        status: RateLimitStatus,
    ) -> RateLimitResult {
        match result {
            RateLimitResult::Denied(denied) if !self.is_live() => {
                tracing::warn!(
                    key = %key.to_redis_key(),
                    reason = ?denied.reason,
                    "dry run: request would have been denied"
                );
                RateLimitResult::Allowed(status)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::ports::{DenialReason, RateLimitDenied};

    fn key() -> RateLimitKey {
        RateLimitKey::user(&UserId::new("user-1").unwrap())
    }

    fn denial() -> RateLimitResult {
        RateLimitResult::Denied(RateLimitDenied {
            reason: DenialReason::RateLimit,
            limit: 5,
            retry_after_secs: 10,
            message: "Rate limit exceeded".to_string(),
        })
    }

    fn status() -> RateLimitStatus {
        RateLimitStatus {
            limit: 5,
            remaining: 0,
            reset_at: Timestamp::now(),
            window_secs: 60,
        }
    }

    #[test]
    fn defaults_are_five_per_minute_live() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 5);
        assert_eq!(config.window_secs, 60);
        assert!(config.is_live());
        assert!(config.bot_detection);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let config: RateLimitConfig = serde_json::from_str(r#"{"mode":"dry_run"}"#).unwrap();
        assert_eq!(config.mode, EnforcementMode::DryRun);
        assert_eq!(config.max_requests, 5);
    }

    #[test]
    fn live_mode_keeps_denials() {
        let config = RateLimitConfig::default();
        let result = config.enforce(&key(), denial(), status());
        assert!(result.is_denied());
    }

    #[test]
    fn dry_run_turns_denials_into_allows() {
        let config = RateLimitConfig {
            mode: EnforcementMode::DryRun,
            ..RateLimitConfig::default()
        };
        let result = config.enforce(&key(), denial(), status());
        assert!(result.is_allowed());
    }
}
