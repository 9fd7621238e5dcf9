//! Checkout configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Where checkout returns to and what it charges in.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutConfig {
    /// Public origin of the site, used for success and cancel URLs
    pub base_url: String,

    /// ISO 4217 code for new prices
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl CheckoutConfig {
    /// Lowercase currency code, as the processor expects it.
    pub fn currency(&self) -> String {
        self.currency.to_lowercase()
    }

    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("CHECKOUT__BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if *environment == Environment::Production && !self.base_url.starts_with("https://") {
            return Err(ValidationError::BaseUrlMustBeHttps);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency);
        }
        Ok(())
    }
}

fn default_currency() -> String {
    "usd".to_string()
}
