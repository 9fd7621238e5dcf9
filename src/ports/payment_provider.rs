//! Payment provider port for external payment processing.
//!
//! Covers the four resources the checkout flow touches: customers,
//! products, prices, and checkout sessions.
//!
//! # Design
//!
//! - **Gateway agnostic**: Interface works with any payment provider
//! - **Lookups are optional**: `get_*` return `Ok(None)` when the provider
//!   has no such resource, errors are reserved for failed calls

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, DomainError, EnrollmentId, UserId};

/// Provider error code for charges below the processor's minimum.
pub const AMOUNT_TOO_SMALL: &str = "amount_too_small";

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a customer in the payment system.
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError>;

    /// Create a product (the purchasable item behind a price).
    async fn create_product(&self, request: CreateProductRequest) -> Result<Product, PaymentError>;

    /// Get a product by provider ID.
    async fn get_product(&self, product_id: &str) -> Result<Option<Product>, PaymentError>;

    /// Create a one-off price under a product.
    async fn create_price(&self, request: CreatePriceRequest) -> Result<Price, PaymentError>;

    /// Get a price by provider ID.
    async fn get_price(&self, price_id: &str) -> Result<Option<Price>, PaymentError>;

    /// Create a hosted checkout session.
    ///
    /// Returns a URL for the customer to complete payment.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}

/// Request to create a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    /// Internal user ID (stored as metadata).
    pub user_id: UserId,

    /// Customer email address.
    pub email: String,

    /// Customer name (optional).
    pub name: Option<String>,

    /// Idempotency key for safe retries.
    pub idempotency_key: Option<String>,
}

/// Customer in the payment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Provider's customer ID.
    pub id: String,

    /// Customer email.
    pub email: String,

    /// Customer name.
    pub name: Option<String>,
}

/// Request to create a product for a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    /// Display name (the course title).
    pub name: String,

    /// Whether the product can be sold.
    pub active: bool,

    /// Course the product sells (stored as metadata).
    pub course_id: CourseId,
}

/// Product in the payment system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub active: bool,
}

/// Request to create a price under a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePriceRequest {
    pub product_id: String,

    /// Amount in the smallest currency unit.
    pub unit_amount: i64,

    /// ISO 4217 currency code, lowercase.
    pub currency: String,
}

/// Price in the payment system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub id: String,

    /// Parent product ID.
    pub product_id: String,

    pub active: bool,
    pub unit_amount: Option<i64>,
    pub currency: String,
}

/// Identifiers echoed back by the provider for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutMetadata {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub enrollment_id: EnrollmentId,
}

/// Request to create a checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Provider's customer ID.
    pub customer_id: String,

    /// Price of the single line item.
    pub price_id: String,

    /// Line item quantity (always 1 for a course seat).
    pub quantity: u32,

    /// Where to send the customer after payment.
    pub success_url: String,

    /// Where to send the customer if they back out.
    pub cancel_url: String,

    pub metadata: CheckoutMetadata,
}

/// Checkout session for payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Session ID.
    pub id: String,

    /// URL to redirect customer to.
    pub url: String,

    /// When the session expires.
    pub expires_at: i64,
}

/// Payment operation error.
///
/// Carries the processor's own diagnostics next to the normalized code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error type (e.g. "invalid_request_error").
    pub error_type: Option<String>,

    /// Provider's error code (e.g. "amount_too_small").
    pub provider_code: Option<String>,

    /// HTTP status returned by the provider.
    pub http_status: Option<u16>,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            error_type: None,
            provider_code: None,
            http_status: None,
        }
    }

    /// Create with provider code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create with provider error type.
    pub fn with_error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    /// Create with the provider's HTTP status.
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    /// Create a generic provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }

    /// Create the processor's minimum-amount rejection.
    pub fn amount_too_small(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
            .with_error_type("invalid_request_error")
            .with_provider_code(AMOUNT_TOO_SMALL)
            .with_http_status(400)
    }

    /// Returns true when the processor refused the charge as below minimum.
    pub fn is_amount_too_small(&self) -> bool {
        self.provider_code.as_deref() == Some(AMOUNT_TOO_SMALL)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        use crate::domain::foundation::ErrorCode;

        let code = match err.code {
            PaymentErrorCode::CardDeclined | PaymentErrorCode::InvalidRequest => {
                ErrorCode::PaymentFailed
            }
            _ => ErrorCode::ExternalServiceError,
        };

        DomainError::new(code, err.message)
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Card was declined.
    CardDeclined,

    /// Request rejected as invalid by the provider.
    InvalidRequest,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider API error.
    ProviderError,
}

impl PaymentErrorCode {
    /// Maps a provider error type and HTTP status onto a code.
    pub fn from_provider(error_type: Option<&str>, status: u16) -> Self {
        match (error_type, status) {
            (Some("card_error"), _) => PaymentErrorCode::CardDeclined,
            (Some("invalid_request_error"), _) => PaymentErrorCode::InvalidRequest,
            (Some("authentication_error"), _) | (_, 401) => PaymentErrorCode::AuthenticationError,
            (Some("rate_limit_error"), _) | (_, 429) => PaymentErrorCode::RateLimitExceeded,
            _ => PaymentErrorCode::ProviderError,
        }
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::CardDeclined => "card_declined",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
