//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `CourseRepository` - Courses and their current payment plan pointer
//! - `EnrollmentRepository` - Transactional enrollment attempts
//! - `UserRepository` - User accounts and their payment customer link
//!
//! ## External Service Ports
//!
//! - `PaymentProvider` - Customers, products, prices and checkout sessions
//! - `RateLimiter` - Per-caller request windows and bot detection
//! - `SessionValidator` - Bearer token validation

mod course_repository;
mod enrollment_repository;
mod payment_provider;
mod rate_limiter;
mod session_validator;
mod user_repository;

pub use course_repository::CourseRepository;
pub use enrollment_repository::EnrollmentRepository;
pub use payment_provider::{
    CheckoutMetadata, CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest,
    CreatePriceRequest, CreateProductRequest, Customer, PaymentError, PaymentErrorCode,
    PaymentProvider, Price, Product, AMOUNT_TOO_SMALL,
};
pub use rate_limiter::{
    DenialReason, RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult,
    RateLimitStatus, RateLimiter,
};
pub use session_validator::SessionValidator;
pub use user_repository::UserRepository;
