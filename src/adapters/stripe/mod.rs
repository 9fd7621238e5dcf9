//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe integration:
//! - Customer creation (idempotent per user)
//! - Products and one-off prices backing a course's payment plan
//! - Hosted checkout sessions
//!
//! The API key is held as `secrecy::SecretString` and only exposed when
//! building the basic-auth header.

mod mock_payment_provider;
mod stripe_adapter;
mod stripe_types;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter, DEFAULT_API_BASE_URL};
