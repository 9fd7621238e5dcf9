//! Course creation error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Unauthorized (no session) | 401 |
//! | Unauthorized (not admin) | 403 |
//! | RateLimited | 429 |
//! | SuspectedBot | 403 |
//! | InvalidInput | 400 |
//! | OperationFailed | 500 |

use crate::domain::foundation::{AccessDenied, DomainError, ErrorCode, ValidationError};

/// Errors surfaced by course creation.
///
/// Messages are deliberately generic; details go to the logs only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseError {
    /// Caller is not signed in, or is not an admin.
    Unauthorized { signed_in: bool },

    /// Caller exceeded the request window.
    RateLimited { retry_after_secs: u32 },

    /// Caller looks like automated traffic.
    SuspectedBot,

    /// Payload failed validation.
    InvalidInput,

    /// Anything unexpected, including persistence failures.
    OperationFailed(String),
}

impl CourseError {
    pub fn operation_failed(reason: impl Into<String>) -> Self {
        CourseError::OperationFailed(reason.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CourseError::Unauthorized { signed_in: false } => ErrorCode::Unauthorized,
            CourseError::Unauthorized { signed_in: true } => ErrorCode::Forbidden,
            CourseError::RateLimited { .. } => ErrorCode::RateLimited,
            CourseError::SuspectedBot => ErrorCode::Forbidden,
            CourseError::InvalidInput => ErrorCode::ValidationFailed,
            CourseError::OperationFailed(_) => ErrorCode::InternalError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            CourseError::Unauthorized { signed_in: false } => {
                "You must be signed in to do that".to_string()
            }
            CourseError::Unauthorized { signed_in: true } => {
                "Only admins can create courses".to_string()
            }
            CourseError::RateLimited { .. } => {
                "Too many requests. Please try again later".to_string()
            }
            CourseError::SuspectedBot => {
                "Request blocked: suspected automated traffic".to_string()
            }
            CourseError::InvalidInput => "Invalid course data".to_string(),
            CourseError::OperationFailed(_) => "Failed to create course".to_string(),
        }
    }
}

impl std::fmt::Display for CourseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CourseError {}

impl From<AccessDenied> for CourseError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Unauthenticated => CourseError::Unauthorized { signed_in: false },
            AccessDenied::NotAdmin => CourseError::Unauthorized { signed_in: true },
            AccessDenied::RateLimited { retry_after_secs } => {
                CourseError::RateLimited { retry_after_secs }
            }
            AccessDenied::SuspectedBot => CourseError::SuspectedBot,
        }
    }
}

impl From<ValidationError> for CourseError {
    fn from(_: ValidationError) -> Self {
        CourseError::InvalidInput
    }
}

impl From<DomainError> for CourseError {
    fn from(err: DomainError) -> Self {
        CourseError::OperationFailed(err.to_string())
    }
}
