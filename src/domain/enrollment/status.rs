//! Enrollment status state machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, ValidationError};

/// Where a user's enrollment in a course stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    /// A checkout attempt is in flight. No course access yet.
    Pending,

    /// Paid (or waived). Full access.
    Active,

    /// The attempt was abandoned or the enrollment was revoked.
    Cancelled,
}

impl EnrollmentStatus {
    /// Returns true if this status grants access to the course.
    pub fn grants_access(&self) -> bool {
        matches!(self, EnrollmentStatus::Active)
    }

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Pending => "pending",
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EnrollmentStatus::Pending),
            "active" => Ok(EnrollmentStatus::Active),
            "cancelled" => Ok(EnrollmentStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown enrollment status '{}'", other),
            )),
        }
    }
}

impl StateMachine for EnrollmentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use EnrollmentStatus::*;
        matches!(
            (self, target),
            // From PENDING
            (Pending, Pending) // Re-attempt re-snapshots the price
                | (Pending, Active)
                | (Pending, Cancelled)
            // From ACTIVE
                | (Active, Cancelled) // Refund or revocation
            // From CANCELLED
                | (Cancelled, Pending)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use EnrollmentStatus::*;
        match self {
            Pending => vec![Pending, Active, Cancelled],
            Active => vec![Cancelled],
            Cancelled => vec![Pending],
        }
    }
}
