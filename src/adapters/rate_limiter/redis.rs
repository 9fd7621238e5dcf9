//! Redis-backed rate limiter implementation for production deployments.
//!
//! Fixed-window counter. The window is opened with `SET NX EX` and counted
//! with `INCR` inside one `MULTI`, so a counter never exists without an expiry.
//! Suitable for multi-server deployments.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    DenialReason, RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult,
    RateLimitStatus, RateLimiter,
};

use super::bot::BotDetector;
use super::config::RateLimitConfig;

/// `TTL` reply for a key that exists but has no expiry.
const NO_EXPIRY: i64 = -1;

/// Redis-backed rate limiter for production multi-server deployments.
///
/// Per request, atomically:
/// 1. `SET key 0 EX window NX` opens the window if none is open
/// 2. `INCR key` counts the request
/// 3. `TTL key` reads the time left in the window
///
/// A counter found without an expiry (written by an older client or by
/// hand) is re-armed to a full window. Requests can briefly exceed limits
/// at window boundaries.
#[derive(Clone)]
pub struct RedisRateLimiter {
    conn: MultiplexedConnection,
    config: RateLimitConfig,
    bots: BotDetector,
}

fn unavailable(e: redis::RedisError) -> RateLimitError {
    RateLimitError::Unavailable(e.to_string())
}

/// Returns true when the counter must be given an expiry again.
fn needs_rearm(ttl: i64) -> bool {
    ttl == NO_EXPIRY
}

fn status_from(config: &RateLimitConfig, count: i64, ttl: i64) -> RateLimitStatus {
    let limit = config.max_requests;
    let reset_secs = if ttl > 0 {
        ttl as u64
    } else {
        config.window_secs as u64
    };

    RateLimitStatus {
        limit,
        remaining: limit.saturating_sub(count.max(0) as u32),
        reset_at: Timestamp::now().plus_secs(reset_secs),
        window_secs: config.window_secs,
    }
}

/// Decides a request from the counter value and window TTL after `INCR`.
fn evaluate(config: &RateLimitConfig, count: i64, ttl: i64) -> (RateLimitResult, RateLimitStatus) {
    let limit = config.max_requests;
    let status = status_from(config, count, ttl);

    if count > limit as i64 {
        let retry_after = if ttl > 0 { ttl as u32 } else { config.window_secs };
        let denied = RateLimitDenied {
            reason: DenialReason::RateLimit,
            limit,
            retry_after_secs: retry_after.max(1),
            message: format!("Rate limit exceeded. Retry after {} seconds.", retry_after),
        };
        return (RateLimitResult::Denied(denied), status);
    }

    (RateLimitResult::Allowed(status.clone()), status)
}

impl RedisRateLimiter {
    /// Create a new Redis rate limiter.
    pub fn new(conn: MultiplexedConnection, config: RateLimitConfig) -> Self {
        Self {
            conn,
            config,
            bots: BotDetector::new(),
        }
    }

    async fn read_status(&self, redis_key: &str) -> Result<RateLimitStatus, RateLimitError> {
        let mut conn = self.conn.clone();

        let count: Option<i64> = conn.get(redis_key).await.map_err(unavailable)?;
        let ttl: i64 = conn.ttl(redis_key).await.map_err(unavailable)?;

        Ok(status_from(&self.config, count.unwrap_or(0), ttl))
    }

    /// Counts one request, returning the new count and the window TTL.
    async fn count_request(&self, redis_key: &str) -> Result<(i64, i64), RateLimitError> {
        let mut conn = self.conn.clone();
        let window_secs = self.config.window_secs as i64;

        let (count, ttl): (i64, i64) = redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(redis_key)
            .arg(0)
            .arg("EX")
            .arg(window_secs)
            .arg("NX")
            .ignore()
            .incr(redis_key, 1_i64)
            .ttl(redis_key)
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;

        if needs_rearm(ttl) {
            tracing::warn!(key = %redis_key, "Rate limit counter had no expiry, re-arming");
            conn.expire::<_, ()>(redis_key, window_secs)
                .await
                .map_err(unavailable)?;
            return Ok((count, window_secs));
        }

        Ok((count, ttl))
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let redis_key = key.to_redis_key();

        if self.config.bot_detection && self.bots.is_suspected(key.user_agent.as_deref()) {
            let status = self.read_status(&redis_key).await?;
            let denied = RateLimitDenied {
                reason: DenialReason::Bot,
                limit: self.config.max_requests,
                retry_after_secs: 0,
                message: "Automated traffic is not allowed".to_string(),
            };
            return Ok(self
                .config
                .enforce(&key, RateLimitResult::Denied(denied), status));
        }

        let (count, ttl) = self.count_request(&redis_key).await?;
        let (result, status) = evaluate(&self.config, count, ttl);
        Ok(self.config.enforce(&key, result, status))
    }

    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        self.read_status(&key.to_redis_key()).await
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(key.to_redis_key())
            .await
            .map_err(unavailable)?;

        Ok(())
    }
}

impl std::fmt::Debug for RedisRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRateLimiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
