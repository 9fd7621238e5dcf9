//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `COURSE_CHECKOUT`
//! prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use course_checkout::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod checkout;
mod database;
mod error;
mod payment;
mod redis;
mod server;

pub use auth::AuthConfig;
pub use checkout::CheckoutConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};

pub use crate::adapters::rate_limiter::{EnforcementMode, RateLimitConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Redis configuration; the rate limiter runs in-process without it
    #[serde(default)]
    pub redis: Option<RedisConfig>,

    /// Session token configuration
    pub auth: AuthConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// Checkout return URLs and currency
    pub checkout: CheckoutConfig,

    /// Request window shared by course creation and enrollment
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `COURSE_CHECKOUT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `COURSE_CHECKOUT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `COURSE_CHECKOUT__RATE_LIMIT__MODE=dry_run` -> `rate_limit.mode = dry_run`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COURSE_CHECKOUT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        if let Some(redis) = &self.redis {
            redis.validate()?;
        }
        self.auth.validate(&self.server.environment)?;
        self.payment.validate()?;
        self.checkout.validate(&self.server.environment)?;
        if self.rate_limit.max_requests == 0 || self.rate_limit.window_secs == 0 {
            return Err(ValidationError::InvalidRateLimit);
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[(&str, &str)] = &[
        ("COURSE_CHECKOUT__DATABASE__URL", "postgresql://test@localhost/courses"),
        ("COURSE_CHECKOUT__AUTH__JWT_ISSUER", "https://auth.example.com"),
        ("COURSE_CHECKOUT__AUTH__JWT_AUDIENCE", "course-checkout"),
        ("COURSE_CHECKOUT__AUTH__JWT_SECRET", "0123456789abcdef0123456789abcdef"),
        ("COURSE_CHECKOUT__PAYMENT__STRIPE_API_KEY", "sk_test_xxx"),
        ("COURSE_CHECKOUT__CHECKOUT__BASE_URL", "https://learn.example.com"),
    ];

    const OPTIONAL: &[&str] = &[
        "COURSE_CHECKOUT__REDIS__URL",
        "COURSE_CHECKOUT__SERVER__ENVIRONMENT",
        "COURSE_CHECKOUT__RATE_LIMIT__MAX_REQUESTS",
        "COURSE_CHECKOUT__RATE_LIMIT__MODE",
        "COURSE_CHECKOUT__CHECKOUT__CURRENCY",
    ];

    fn set_minimal_env() {
        for (key, value) in VARS {
            env::set_var(key, value);
        }
    }

    fn clear_env() {
        for (key, _) in VARS {
            env::remove_var(key);
        }
        for key in OPTIONAL {
            env::remove_var(key);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_applies_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.database.url, "postgresql://test@localhost/courses");
        assert!(config.redis.is_none());
        assert_eq!(config.checkout.currency(), "usd");
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert!(config.rate_limit.is_live());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_nested_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("COURSE_CHECKOUT__REDIS__URL", "redis://localhost:6379"),
            ("COURSE_CHECKOUT__RATE_LIMIT__MAX_REQUESTS", "10"),
            ("COURSE_CHECKOUT__RATE_LIMIT__MODE", "dry_run"),
            ("COURSE_CHECKOUT__CHECKOUT__CURRENCY", "EUR"),
        ])
        .unwrap();

        assert_eq!(config.redis.unwrap().url, "redis://localhost:6379");
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.rate_limit.mode, EnforcementMode::DryRun);
        assert_eq!(config.checkout.currency(), "eur");
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("COURSE_CHECKOUT__SERVER__ENVIRONMENT", "production")]).unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_missing_section_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let result = AppConfig::load();
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_zero_window_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let mut config = load_with(&[]).unwrap();
        config.rate_limit.window_secs = 0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidRateLimit));
    }
}
