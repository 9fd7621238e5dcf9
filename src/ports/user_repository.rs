//! User account repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::UserAccount;

/// Repository port for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find an account by user ID.
    ///
    /// Returns `None` if the user has never been seen.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError>;

    /// Insert or update an account.
    ///
    /// An already stored customer ID is never cleared by an upsert that
    /// carries `None`.
    async fn upsert(&self, account: &UserAccount) -> Result<(), DomainError>;
}
