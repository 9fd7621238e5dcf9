//! Enrollment error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Unauthorized | 401 |
//! | RateLimited | 429 |
//! | SuspectedBot | 403 |
//! | CourseNotFound | 404 |
//! | PaymentFailed | 502 |
//! | OperationFailed | 500 |

use crate::domain::foundation::{AccessDenied, CourseId, DomainError, ErrorCode};

/// Fallback shown when an unexpected failure carries no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors surfaced by the enrollment checkout flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    /// No session.
    Unauthorized,

    /// Caller exceeded the request window.
    RateLimited { retry_after_secs: u32 },

    /// Caller looks like automated traffic.
    SuspectedBot,

    /// The course does not exist.
    CourseNotFound(CourseId),

    /// The payment processor rejected a call.
    PaymentFailed {
        provider_code: Option<String>,
        reason: String,
    },

    /// Anything else. `None` falls back to a static message.
    OperationFailed(Option<String>),
}

impl EnrollmentError {
    pub fn course_not_found(id: CourseId) -> Self {
        EnrollmentError::CourseNotFound(id)
    }

    pub fn payment_failed(provider_code: Option<String>, reason: impl Into<String>) -> Self {
        EnrollmentError::PaymentFailed {
            provider_code,
            reason: reason.into(),
        }
    }

    pub fn operation_failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if reason.trim().is_empty() {
            EnrollmentError::OperationFailed(None)
        } else {
            EnrollmentError::OperationFailed(Some(reason))
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EnrollmentError::Unauthorized => ErrorCode::Unauthorized,
            EnrollmentError::RateLimited { .. } => ErrorCode::RateLimited,
            EnrollmentError::SuspectedBot => ErrorCode::Forbidden,
            EnrollmentError::CourseNotFound(_) => ErrorCode::CourseNotFound,
            EnrollmentError::PaymentFailed { .. } => ErrorCode::PaymentFailed,
            EnrollmentError::OperationFailed(_) => ErrorCode::InternalError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            EnrollmentError::Unauthorized => "You must be signed in to do that".to_string(),
            EnrollmentError::RateLimited { .. } => {
                "Too many requests. Please try again later".to_string()
            }
            EnrollmentError::SuspectedBot => {
                "Request blocked: suspected automated traffic".to_string()
            }
            EnrollmentError::CourseNotFound(_) => "Course not found".to_string(),
            EnrollmentError::PaymentFailed { reason, .. } => format!("Payment error: {}", reason),
            EnrollmentError::OperationFailed(Some(reason)) => reason.clone(),
            EnrollmentError::OperationFailed(None) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl std::fmt::Display for EnrollmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EnrollmentError {}

impl From<AccessDenied> for EnrollmentError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::Unauthenticated | AccessDenied::NotAdmin => EnrollmentError::Unauthorized,
            AccessDenied::RateLimited { retry_after_secs } => {
                EnrollmentError::RateLimited { retry_after_secs }
            }
            AccessDenied::SuspectedBot => EnrollmentError::SuspectedBot,
        }
    }
}

impl From<DomainError> for EnrollmentError {
    fn from(err: DomainError) -> Self {
        EnrollmentError::operation_failed(err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_failure_embeds_processor_message() {
        let err = EnrollmentError::payment_failed(
            Some("card_declined".to_string()),
            "Your card was declined.",
        );
        assert_eq!(err.message(), "Payment error: Your card was declined.");
        assert_eq!(err.code(), ErrorCode::PaymentFailed);
    }

    #[test]
    fn empty_failure_message_uses_fallback() {
        let err = EnrollmentError::operation_failed("  ");
        assert_eq!(err.message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn domain_errors_keep_their_message() {
        let err: EnrollmentError = DomainError::database("pool timed out").into();
        assert_eq!(err.message(), "pool timed out");
    }

    #[test]
    fn not_found_uses_static_message() {
        assert_eq!(
            EnrollmentError::course_not_found(CourseId::new()).message(),
            "Course not found"
        );
    }
}
