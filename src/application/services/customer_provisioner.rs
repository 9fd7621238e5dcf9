//! Customer provisioner - one payment customer per user, created lazily.

use std::sync::Arc;

use crate::domain::foundation::AuthenticatedUser;
use crate::domain::user::UserAccount;
use crate::ports::{CreateCustomerRequest, PaymentProvider, UserRepository};

use super::ProvisioningError;

/// Ensures a user has an external payment customer.
///
/// Two concurrent first calls for the same user are narrowed, not prevented,
/// by the per-user idempotency key on the create call.
pub struct CustomerProvisioner {
    users: Arc<dyn UserRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl CustomerProvisioner {
    pub fn new(users: Arc<dyn UserRepository>, payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self {
            users,
            payment_provider,
        }
    }

    /// Returns the user's customer ID, creating and storing one if needed.
    pub async fn ensure_customer(&self, user: &AuthenticatedUser) -> Result<String, ProvisioningError> {
        let mut account = match self.users.find_by_id(&user.id).await? {
            Some(account) => account,
            None => UserAccount::from_identity(user),
        };

        if let Some(customer_id) = &account.stripe_customer_id {
            return Ok(customer_id.clone());
        }

        let customer = self
            .payment_provider
            .create_customer(CreateCustomerRequest {
                user_id: user.id.clone(),
                email: account.email.clone(),
                name: account.name.clone(),
                idempotency_key: Some(format!("customer-{}", user.id)),
            })
            .await?;

        account.attach_customer(customer.id.clone());
        self.users.upsert(&account).await?;

        tracing::info!(user_id = %user.id, customer_id = %customer.id, "Payment customer created");

        Ok(customer.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::foundation::UserId;
    use crate::ports::PaymentError;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("user-1").unwrap(),
            "user@example.com",
            Some("Ada".to_string()),
        )
    }

    fn setup() -> (CustomerProvisioner, Arc<InMemoryUserRepository>, MockPaymentProvider) {
        let users = Arc::new(InMemoryUserRepository::new());
        let payments = MockPaymentProvider::new();
        let provisioner = CustomerProvisioner::new(users.clone(), Arc::new(payments.clone()));
        (provisioner, users, payments)
    }

    #[tokio::test]
    async fn first_call_creates_and_stores_customer() {
        let (provisioner, users, payments) = setup();

        let customer_id = provisioner.ensure_customer(&user()).await.unwrap();

        let stored = users.find_by_id(&user().id).await.unwrap().unwrap();
        assert_eq!(stored.stripe_customer_id, Some(customer_id));
        assert_eq!(stored.name.as_deref(), Some("Ada"));
        assert_eq!(payments.call_count("create_customer"), 1);
        assert_eq!(payments.calls()[0].args, vec!["user-1", "user@example.com"]);
    }

    #[tokio::test]
    async fn cached_customer_is_reused_without_calling_provider() {
        let (provisioner, _users, payments) = setup();

        let first = provisioner.ensure_customer(&user()).await.unwrap();
        let second = provisioner.ensure_customer(&user()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(payments.call_count("create_customer"), 1);
    }

    #[tokio::test]
    async fn provider_failure_stores_nothing() {
        let (provisioner, users, payments) = setup();
        payments.set_method_error("create_customer", PaymentError::network("timeout"));

        let result = provisioner.ensure_customer(&user()).await;

        assert!(matches!(result, Err(ProvisioningError::Payment(_))));
        assert!(users.find_by_id(&user().id).await.unwrap().is_none());
    }
}
