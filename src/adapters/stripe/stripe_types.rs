//! Stripe API response types.
//!
//! Only the fields the checkout flow reads are modelled; everything else
//! in the payload is ignored by serde.

use serde::Deserialize;

/// Stripe customer object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCustomer {
    /// Unique customer identifier (cus_...).
    pub id: String,

    /// Customer email address.
    pub email: Option<String>,

    /// Customer name.
    pub name: Option<String>,
}

/// Stripe product object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeProduct {
    /// Unique product identifier (prod_...).
    pub id: String,

    pub name: String,

    pub active: bool,
}

/// Stripe price object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripePrice {
    /// Unique price identifier (price_...).
    pub id: String,

    /// Parent product ID (unexpanded).
    pub product: String,

    pub active: bool,

    /// Null for metered or custom-amount prices.
    pub unit_amount: Option<i64>,

    pub currency: String,
}

/// Stripe checkout session object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCheckoutSession {
    /// Unique session identifier (cs_...).
    pub id: String,

    /// Hosted payment page. Absent once the session completes or expires.
    pub url: Option<String>,

    /// Unix timestamp when the session expires.
    pub expires_at: Option<i64>,
}

/// Error envelope returned on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    /// e.g. "invalid_request_error", "card_error".
    #[serde(rename = "type")]
    pub error_type: Option<String>,

    /// e.g. "amount_too_small", "resource_missing".
    pub code: Option<String>,

    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_error_envelope() {
        let json = r#"{
            "error": {
                "code": "amount_too_small",
                "message": "Amount must be at least $0.50 usd",
                "param": "unit_amount",
                "type": "invalid_request_error"
            }
        }"#;

        let parsed: StripeErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.error.code.as_deref(), Some("amount_too_small"));
        assert_eq!(parsed.error.error_type.as_deref(), Some("invalid_request_error"));
    }

    #[test]
    fn parses_price_with_null_amount() {
        let json = r#"{
            "id": "price_123",
            "object": "price",
            "active": true,
            "currency": "usd",
            "product": "prod_123",
            "unit_amount": null
        }"#;

        let price: StripePrice = serde_json::from_str(json).unwrap();
        assert_eq!(price.product, "prod_123");
        assert!(price.unit_amount.is_none());
    }

    #[test]
    fn parses_checkout_session_url() {
        let json = r#"{
            "id": "cs_test_123",
            "object": "checkout.session",
            "url": "https://checkout.stripe.com/c/pay/cs_test_123",
            "expires_at": 1700000000
        }"#;

        let session: StripeCheckoutSession = serde_json::from_str(json).unwrap();
        assert_eq!(
            session.url.as_deref(),
            Some("https://checkout.stripe.com/c/pay/cs_test_123")
        );
        assert_eq!(session.expires_at, Some(1700000000));
    }
}
