//! Request guard: caller authentication plus the shared rate limit.
//!
//! Both handlers run the same two checks before doing any work. The
//! limiter is keyed by the caller's user ID so a user's course creations
//! and enrollment attempts share one window.

use std::sync::Arc;

use crate::domain::foundation::{AccessDenied, AuthenticatedUser};
use crate::ports::{RateLimitKey, RateLimitResult, RateLimiter};

/// What a guarded action requires of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Any signed-in user.
    SignedIn,
    /// A signed-in admin.
    Admin,
}

/// Authenticates and rate limits callers.
pub struct RequestGuard {
    rate_limiter: Arc<dyn RateLimiter>,
}

impl RequestGuard {
    pub fn new(rate_limiter: Arc<dyn RateLimiter>) -> Self {
        Self { rate_limiter }
    }

    /// Admits the caller or says why not.
    ///
    /// A limiter outage fails open: the request proceeds and the outage is
    /// logged.
    pub async fn admit(
        &self,
        caller: Option<AuthenticatedUser>,
        requirement: Requirement,
        user_agent: Option<String>,
    ) -> Result<AuthenticatedUser, AccessDenied> {
        let user = caller.ok_or(AccessDenied::Unauthenticated)?;

        if requirement == Requirement::Admin && !user.is_admin() {
            tracing::warn!(user_id = %user.id, "Non-admin attempted an admin action");
            return Err(AccessDenied::NotAdmin);
        }

        let key = RateLimitKey::user(&user.id).with_user_agent(user_agent);

        match self.rate_limiter.check(key).await {
            Ok(RateLimitResult::Allowed(_)) => Ok(user),
            Ok(RateLimitResult::Denied(denied)) => {
                tracing::warn!(
                    user_id = %user.id,
                    reason = ?denied.reason,
                    retry_after_secs = denied.retry_after_secs,
                    detail = %denied.message,
                    "Request denied by rate limiter"
                );
                if denied.reason.is_rate_limit() {
                    Err(AccessDenied::RateLimited {
                        retry_after_secs: denied.retry_after_secs,
                    })
                } else {
                    Err(AccessDenied::SuspectedBot)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, user_id = %user.id, "Rate limiter unavailable, allowing request");
                Ok(user)
            }
        }
    }
}
