//! Authentication types for the domain layer.
//!
//! `AuthenticatedUser` is what every request handler sees of the caller.
//! Any identity provider can populate it through the `SessionValidator` port;
//! the domain never touches tokens or provider claims directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UserId;

/// Platform role of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular user who can enroll in courses.
    #[default]
    Member,
    /// Operator who can create courses.
    Admin,
}

impl UserRole {
    /// Parses a role claim, treating unknown values as `Member`.
    pub fn from_claim(value: &str) -> Self {
        if value.eq_ignore_ascii_case("admin") {
            UserRole::Admin
        } else {
            UserRole::Member
        }
    }
}

/// Authenticated caller resolved from a validated session.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// User's email address from the token claims.
    pub email: String,

    /// Display name if available.
    pub display_name: Option<String>,

    /// Platform role.
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Creates a new authenticated member.
    pub fn new(id: UserId, email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            role: UserRole::Member,
        }
    }

    /// Sets the caller's role.
    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// Returns true when the caller may perform admin-only operations.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Returns the user's display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("user-123").unwrap(),
            "member@example.com",
            Some("Alice".to_string()),
        )
    }

    #[test]
    fn new_user_defaults_to_member() {
        let user = member();
        assert_eq!(user.role, UserRole::Member);
        assert!(!user.is_admin());
    }

    #[test]
    fn with_role_admin_grants_admin() {
        assert!(member().with_role(UserRole::Admin).is_admin());
    }

    #[test]
    fn role_claim_parsing_is_case_insensitive() {
        assert_eq!(UserRole::from_claim("ADMIN"), UserRole::Admin);
        assert_eq!(UserRole::from_claim("admin"), UserRole::Admin);
        assert_eq!(UserRole::from_claim("editor"), UserRole::Member);
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut user = member();
        assert_eq!(user.display_name_or_email(), "Alice");
        user.display_name = None;
        assert_eq!(user.display_name_or_email(), "member@example.com");
    }
}
