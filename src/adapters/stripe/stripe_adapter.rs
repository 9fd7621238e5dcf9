//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe REST API using
//! form-encoded requests. Non-2xx responses are parsed into `PaymentError`
//! keeping Stripe's error type, code, message and HTTP status.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, CreatePriceRequest,
    CreateProductRequest, Customer, PaymentError, PaymentErrorCode, PaymentProvider, Price,
    Product,
};

use super::stripe_types::{
    StripeCheckoutSession, StripeCustomer, StripeErrorResponse, StripePrice, StripeProduct,
};

/// Default Stripe API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe checkout sessions expire after 24 hours by default.
const DEFAULT_SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Create configuration from an already wrapped secret.
    pub fn from_secret(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.api_base_url, path)
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        params: &[(&str, String)],
        idempotency_key: Option<&str>,
    ) -> Result<T, PaymentError> {
        let mut request = self
            .http_client
            .post(self.url(path))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(params);

        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        Self::parse(operation, response).await
    }

    async fn get_optional<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
    ) -> Result<Option<T>, PaymentError> {
        let response = self
            .http_client
            .get(self.url(path))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::parse(operation, response).await.map(Some)
    }

    async fn parse<T: DeserializeOwned>(
        operation: &'static str,
        response: reqwest::Response,
    ) -> Result<T, PaymentError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = error_from_response(status.as_u16(), &body);
            tracing::error!(
                operation,
                status = status.as_u16(),
                error_type = err.error_type.as_deref().unwrap_or("unknown"),
                code = err.provider_code.as_deref().unwrap_or("none"),
                message = %err.message,
                "Stripe request failed"
            );
            return Err(err);
        }

        response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse Stripe response: {}", e),
            )
        })
    }
}

/// Builds a `PaymentError` from a failed Stripe response body.
fn error_from_response(status: u16, body: &str) -> PaymentError {
    match serde_json::from_str::<StripeErrorResponse>(body) {
        Ok(StripeErrorResponse { error }) => {
            let code = PaymentErrorCode::from_provider(error.error_type.as_deref(), status);
            let message = error
                .message
                .unwrap_or_else(|| format!("Stripe API error ({})", status));

            let mut err = PaymentError::new(code, message).with_http_status(status);
            if let Some(error_type) = error.error_type {
                err = err.with_error_type(error_type);
            }
            if let Some(provider_code) = error.code {
                err = err.with_provider_code(provider_code);
            }
            err
        }
        Err(_) => PaymentError::new(
            PaymentErrorCode::from_provider(None, status),
            format!("Stripe API error: {}", body),
        )
        .with_http_status(status),
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        let mut params = vec![
            ("email", request.email.clone()),
            ("metadata[user_id]", request.user_id.to_string()),
        ];

        if let Some(name) = &request.name {
            params.push(("name", name.clone()));
        }

        let customer: StripeCustomer = self
            .post_form(
                "create_customer",
                "customers",
                &params,
                request.idempotency_key.as_deref(),
            )
            .await?;

        Ok(Customer {
            id: customer.id,
            email: customer.email.unwrap_or(request.email),
            name: customer.name.or(request.name),
        })
    }

    async fn create_product(&self, request: CreateProductRequest) -> Result<Product, PaymentError> {
        let params = vec![
            ("name", request.name),
            ("active", request.active.to_string()),
            ("metadata[course_id]", request.course_id.to_string()),
        ];

        let product: StripeProduct = self
            .post_form("create_product", "products", &params, None)
            .await?;

        Ok(Product {
            id: product.id,
            name: product.name,
            active: product.active,
        })
    }

    async fn get_product(&self, product_id: &str) -> Result<Option<Product>, PaymentError> {
        let product: Option<StripeProduct> = self
            .get_optional("get_product", &format!("products/{}", product_id))
            .await?;

        Ok(product.map(|p| Product {
            id: p.id,
            name: p.name,
            active: p.active,
        }))
    }

    async fn create_price(&self, request: CreatePriceRequest) -> Result<Price, PaymentError> {
        let params = vec![
            ("product", request.product_id),
            ("unit_amount", request.unit_amount.to_string()),
            ("currency", request.currency),
        ];

        let price: StripePrice = self
            .post_form("create_price", "prices", &params, None)
            .await?;

        Ok(price.into())
    }

    async fn get_price(&self, price_id: &str) -> Result<Option<Price>, PaymentError> {
        let price: Option<StripePrice> = self
            .get_optional("get_price", &format!("prices/{}", price_id))
            .await?;

        Ok(price.map(Price::from))
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let params = checkout_params(&request);

        let session: StripeCheckoutSession = self
            .post_form("create_checkout_session", "checkout/sessions", &params, None)
            .await?;

        let url = session.url.ok_or_else(|| {
            PaymentError::provider("Stripe checkout session has no redirect URL")
        })?;

        let expires_at = session
            .expires_at
            .unwrap_or_else(|| chrono::Utc::now().timestamp() + DEFAULT_SESSION_TTL_SECS);

        tracing::info!(session_id = %session.id, "Stripe checkout session created");

        Ok(CheckoutSession {
            id: session.id,
            url,
            expires_at,
        })
    }
}

impl From<StripePrice> for Price {
    fn from(price: StripePrice) -> Self {
        Price {
            id: price.id,
            product_id: price.product,
            active: price.active,
            unit_amount: price.unit_amount,
            currency: price.currency,
        }
    }
}

/// Form fields for a one-off payment checkout with a single line item.
fn checkout_params(request: &CreateCheckoutRequest) -> Vec<(&'static str, String)> {
    vec![
        ("mode", "payment".to_string()),
        ("customer", request.customer_id.clone()),
        ("line_items[0][price]", request.price_id.clone()),
        ("line_items[0][quantity]", request.quantity.to_string()),
        ("success_url", request.success_url.clone()),
        ("cancel_url", request.cancel_url.clone()),
        ("metadata[user_id]", request.metadata.user_id.to_string()),
        ("metadata[course_id]", request.metadata.course_id.to_string()),
        (
            "metadata[enrollment_id]",
            request.metadata.enrollment_id.to_string(),
        ),
    ]
}
