//! Platform user as seen by billing.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthenticatedUser, UserId};

/// A user record with its external payment-customer link.
///
/// # Invariants
///
/// - `stripe_customer_id` is set at most once and then reused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub stripe_customer_id: Option<String>,
}

impl UserAccount {
    /// Seeds an account from the caller's session claims.
    pub fn from_identity(user: &AuthenticatedUser) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.display_name.clone(),
            stripe_customer_id: None,
        }
    }

    /// Links the external customer. Returns false if one was already linked.
    pub fn attach_customer(&mut self, customer_id: impl Into<String>) -> bool {
        if self.stripe_customer_id.is_some() {
            return false;
        }
        self.stripe_customer_id = Some(customer_id.into());
        true
    }
}
