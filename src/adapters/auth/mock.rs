//! Mock session validator for testing.
//!
//! # Example
//!
//! ```ignore
//! let validator = MockSessionValidator::new()
//!     .with_test_user("member-token", "user-123")
//!     .with_test_admin("admin-token", "admin-1");
//!
//! let result = validator.validate("member-token").await;
//! assert!(result.is_ok());
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId, UserRole};
use crate::ports::SessionValidator;

/// Mock session validator for testing.
///
/// Stores a map of tokens to users. Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    /// Map of valid tokens to their associated users
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Optional error to return for all validations (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    /// Creates a new empty mock validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.write().unwrap().insert(token.into(), user);
        self
    }

    /// Adds a valid token for a member with a generated email.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user = test_user(user_id.into());
        self.with_user(token, user)
    }

    /// Adds a valid token for an admin with a generated email.
    pub fn with_test_admin(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user = test_user(user_id.into()).with_role(UserRole::Admin);
        self.with_user(token, user)
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }
}

fn test_user(user_id: String) -> AuthenticatedUser {
    AuthenticatedUser::new(
        UserId::new(&user_id).unwrap(),
        format!("{}@test.example.com", user_id),
        Some(format!("Test User {}", user_id)),
    )
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registered_tokens_resolve_with_role() {
        let validator = MockSessionValidator::new()
            .with_test_user("member", "user-1")
            .with_test_admin("admin", "admin-1");

        assert!(!validator.validate("member").await.unwrap().is_admin());
        assert!(validator.validate("admin").await.unwrap().is_admin());
        assert!(validator.validate("unknown").await.is_err());
    }

    #[tokio::test]
    async fn forced_error_overrides_tokens() {
        let validator = MockSessionValidator::new()
            .with_test_user("member", "user-1")
            .with_error(AuthError::service_unavailable("down"));

        assert!(matches!(
            validator.validate("member").await,
            Err(AuthError::ServiceUnavailable(_))
        ));

        validator.clear_error();
        assert!(validator.validate("member").await.is_ok());
    }
}
