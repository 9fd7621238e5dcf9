//! In-memory rate limiter implementation for testing and development.
//!
//! Uses a fixed-window counter algorithm with an in-memory HashMap.
//! Expired windows are pruned on write, at most once per window length.
//! Not suitable for production multi-server deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    DenialReason, RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult,
    RateLimitStatus, RateLimiter,
};

use super::bot::BotDetector;
use super::config::RateLimitConfig;

/// In-memory rate limiter for testing and single-server deployments.
///
/// Each window tracks the count of requests and resets when it expires.
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    bots: BotDetector,
    /// Per-key window state.
    windows: Arc<RwLock<Windows>>,
}

#[derive(Debug, Default)]
struct Windows {
    entries: HashMap<String, WindowState>,
    /// When expired entries were last swept.
    last_pruned: u64,
}

impl Windows {
    fn prune(&mut self, now: u64, window_secs: u64) {
        if now < self.last_pruned + window_secs {
            return;
        }
        self.entries
            .retain(|_, state| now < state.window_start + window_secs);
        self.last_pruned = now;
    }
}

/// State for a single rate limit window.
#[derive(Debug, Clone)]
struct WindowState {
    /// Number of requests in the current window.
    count: u32,
    /// When the current window started.
    window_start: u64,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            bots: BotDetector::new(),
            windows: Arc::new(RwLock::new(Windows::default())),
        }
    }

    /// Create a rate limiter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    fn now_secs() -> u64 {
        Timestamp::now().as_unix_secs()
    }

    fn status_at(&self, count: u32, window_start: u64) -> RateLimitStatus {
        RateLimitStatus {
            limit: self.config.max_requests,
            remaining: self.config.max_requests.saturating_sub(count),
            reset_at: Timestamp::from_unix_secs(window_start + self.config.window_secs as u64),
            window_secs: self.config.window_secs,
        }
    }

    async fn decide(&self, key: &RateLimitKey, now: u64) -> (RateLimitResult, RateLimitStatus) {
        let limit = self.config.max_requests;
        let window_secs = self.config.window_secs as u64;

        if self.config.bot_detection && self.bots.is_suspected(key.user_agent.as_deref()) {
            let status = self.peek(key, now).await;
            let denied = RateLimitDenied {
                reason: DenialReason::Bot,
                limit,
                retry_after_secs: 0,
                message: "Automated traffic is not allowed".to_string(),
            };
            return (RateLimitResult::Denied(denied), status);
        }

        let mut windows = self.windows.write().await;
        windows.prune(now, window_secs);

        let state = windows
            .entries
            .entry(key.to_redis_key())
            .or_insert_with(|| WindowState {
                count: 0,
                window_start: now,
            });

        if now >= state.window_start + window_secs {
            state.count = 0;
            state.window_start = now;
        }

        if state.count >= limit {
            let retry_after = (state.window_start + window_secs).saturating_sub(now) as u32;
            let status = self.status_at(state.count, state.window_start);
            let denied = RateLimitDenied {
                reason: DenialReason::RateLimit,
                limit,
                retry_after_secs: retry_after.max(1),
                message: format!(
                    "Rate limit exceeded. Retry after {} seconds.",
                    retry_after
                ),
            };
            return (RateLimitResult::Denied(denied), status);
        }

        state.count += 1;
        let status = self.status_at(state.count, state.window_start);
        (RateLimitResult::Allowed(status.clone()), status)
    }

    async fn peek(&self, key: &RateLimitKey, now: u64) -> RateLimitStatus {
        let windows = self.windows.read().await;
        let window_secs = self.config.window_secs as u64;

        let (count, window_start) = windows
            .entries
            .get(&key.to_redis_key())
            .map(|state| {
                if now >= state.window_start + window_secs {
                    (0, now)
                } else {
                    (state.count, state.window_start)
                }
            })
            .unwrap_or((0, now));

        self.status_at(count, window_start)
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let (result, status) = self.decide(&key, Self::now_secs()).await;
        Ok(self.config.enforce(&key, result, status))
    }

    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        Ok(self.peek(&key, Self::now_secs()).await)
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        let mut windows = self.windows.write().await;
        windows.entries.remove(&key.to_redis_key());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::rate_limiter::EnforcementMode;
    use crate::domain::foundation::UserId;

    fn user_key() -> RateLimitKey {
        RateLimitKey::user(&UserId::new("test-user-123").unwrap())
    }

    fn key_for(user: &str) -> RateLimitKey {
        RateLimitKey::user(&UserId::new(user).unwrap())
    }

    // ─── Basic Functionality Tests ───────────────────────────────────

    #[tokio::test]
    async fn sixth_request_in_window_is_denied() {
        let limiter = InMemoryRateLimiter::with_defaults();

        for i in 0..5 {
            let result = limiter.check(user_key()).await.unwrap();
            assert!(result.is_allowed(), "Request {} should be allowed", i + 1);
        }

        let result = limiter.check(user_key()).await.unwrap();
        let RateLimitResult::Denied(denied) = result else {
            panic!("sixth request should be denied");
        };
        assert_eq!(denied.reason, DenialReason::RateLimit);
        assert_eq!(denied.limit, 5);
        assert!(denied.retry_after_secs > 0);
    }

    #[tokio::test]
    async fn status_returns_remaining_count() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig::with_limit(10, 60));
        let key = key_for("user-10");

        let status = limiter.status(key.clone()).await.unwrap();
        assert_eq!(status.limit, 10);
        assert_eq!(status.remaining, 10);

        for _ in 0..3 {
            limiter.check(key.clone()).await.unwrap();
        }

        let status = limiter.status(key.clone()).await.unwrap();
        assert_eq!(status.remaining, 7);
    }

    #[tokio::test]
    async fn reset_clears_counter() {
        let limiter = InMemoryRateLimiter::with_defaults();

        for _ in 0..5 {
            limiter.check(user_key()).await.unwrap();
        }
        assert!(limiter.check(user_key()).await.unwrap().is_denied());

        limiter.reset(user_key()).await.unwrap();

        assert!(limiter.check(user_key()).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn different_users_have_independent_limits() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig::with_limit(1, 60));
        let alice = RateLimitKey::user(&UserId::new("alice").unwrap());
        let bob = RateLimitKey::user(&UserId::new("bob").unwrap());

        limiter.check(alice.clone()).await.unwrap();
        assert!(limiter.check(alice).await.unwrap().is_denied());
        assert!(limiter.check(bob).await.unwrap().is_allowed());
    }

    // ─── Bot Detection Tests ─────────────────────────────────────────

    #[tokio::test]
    async fn automated_agent_is_denied_as_bot_without_consuming_quota() {
        let limiter = InMemoryRateLimiter::with_defaults();
        let key = user_key().with_user_agent(Some("curl/8.4.0".to_string()));

        let result = limiter.check(key).await.unwrap();
        let RateLimitResult::Denied(denied) = result else {
            panic!("curl should be flagged");
        };
        assert_eq!(denied.reason, DenialReason::Bot);

        let status = limiter.status(user_key()).await.unwrap();
        assert_eq!(status.remaining, 5);
    }

    #[tokio::test]
    async fn bot_detection_can_be_disabled() {
        let config = RateLimitConfig {
            bot_detection: false,
            ..RateLimitConfig::default()
        };
        let limiter = InMemoryRateLimiter::new(config);
        let key = user_key().with_user_agent(Some("curl/8.4.0".to_string()));

        assert!(limiter.check(key).await.unwrap().is_allowed());
    }

    // ─── Enforcement Mode Tests ──────────────────────────────────────

    #[tokio::test]
    async fn dry_run_never_denies() {
        let config = RateLimitConfig {
            mode: EnforcementMode::DryRun,
            ..RateLimitConfig::with_limit(1, 60)
        };
        let limiter = InMemoryRateLimiter::new(config);

        for _ in 0..3 {
            assert!(limiter.check(user_key()).await.unwrap().is_allowed());
        }
    }

    #[tokio::test]
    async fn remaining_decrements_correctly() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig::with_limit(10, 60));
        let key = key_for("user-remaining");

        for expected_remaining in (0..10u32).rev() {
            let result = limiter.check(key.clone()).await.unwrap();
            if let RateLimitResult::Allowed(status) = result {
                assert_eq!(status.remaining, expected_remaining);
            }
        }
    }

    // ─── Pruning Tests ───────────────────────────────────────────────

    #[tokio::test]
    async fn expired_windows_are_pruned_on_write() {
        let limiter = InMemoryRateLimiter::with_defaults();
        let now = InMemoryRateLimiter::now_secs();

        for user in ["alice", "bob", "carol"] {
            limiter.decide(&key_for(user), now).await;
        }
        assert_eq!(limiter.windows.read().await.entries.len(), 3);

        limiter.decide(&key_for("dave"), now + 61).await;

        let windows = limiter.windows.read().await;
        assert_eq!(windows.entries.len(), 1);
        assert!(windows.entries.contains_key(&key_for("dave").to_redis_key()));
    }

    #[tokio::test]
    async fn live_windows_survive_pruning() {
        let limiter = InMemoryRateLimiter::with_defaults();
        let now = InMemoryRateLimiter::now_secs();

        limiter.decide(&key_for("alice"), now).await;
        limiter.decide(&key_for("bob"), now + 30).await;
        limiter.decide(&key_for("carol"), now + 70).await;

        let windows = limiter.windows.read().await;
        assert!(!windows.entries.contains_key(&key_for("alice").to_redis_key()));
        assert!(windows.entries.contains_key(&key_for("bob").to_redis_key()));
        assert_eq!(windows.entries.len(), 2);
    }
}
