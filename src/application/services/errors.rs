//! Errors shared by the provisioning services.

use thiserror::Error;

use crate::domain::foundation::DomainError;
use crate::ports::PaymentError;

/// A provisioning step failed either at the payment processor or in the store.
#[derive(Debug, Clone, Error)]
pub enum ProvisioningError {
    #[error("payment provider: {0}")]
    Payment(#[from] PaymentError),

    #[error("store: {0}")]
    Store(#[from] DomainError),
}
