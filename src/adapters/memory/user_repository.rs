//! In-memory user account repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::UserAccount;
use crate::ports::UserRepository;

/// In-memory storage for user accounts
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, UserAccount>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn upsert(&self, account: &UserAccount) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let mut account = account.clone();
        if let Some(existing) = users.get(&account.id) {
            if account.stripe_customer_id.is_none() {
                account.stripe_customer_id = existing.stripe_customer_id.clone();
            }
        }
        users.insert(account.id.clone(), account);
        Ok(())
    }
}
