//! Reasons a caller is turned away before any work is done.

use std::fmt;

/// Rejection produced by the request guard (identity, role, rate limit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    /// No session could be resolved.
    Unauthenticated,
    /// Signed in, but lacking the admin role.
    NotAdmin,
    /// Too many requests in the current window.
    RateLimited { retry_after_secs: u32 },
    /// The limiter flagged the caller as automated traffic.
    SuspectedBot,
}

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessDenied::Unauthenticated => write!(f, "unauthenticated"),
            AccessDenied::NotAdmin => write!(f, "admin role required"),
            AccessDenied::RateLimited { retry_after_secs } => {
                write!(f, "rate limited, retry after {}s", retry_after_secs)
            }
            AccessDenied::SuspectedBot => write!(f, "suspected automated traffic"),
        }
    }
}
