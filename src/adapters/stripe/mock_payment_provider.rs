//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - An in-memory product and price catalogue
//! - Error injection
//! - Call tracking and request capture

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, CreatePriceRequest,
    CreateProductRequest, Customer, PaymentError, PaymentProvider, Price, Product,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Inject errors
/// mock.set_method_error("create_checkout_session", PaymentError::amount_too_small("min"));
///
/// // Use in tests, then assert on calls
/// assert_eq!(mock.call_count("create_price"), 1);
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    customers: HashMap<String, Customer>,
    products: HashMap<String, Product>,
    prices: HashMap<String, Price>,

    /// Requests passed to `create_checkout_session`, in order.
    checkout_requests: Vec<CreateCheckoutRequest>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,

    /// Sequence for generated IDs.
    next_id: u64,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockState {
    fn generate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}_mock_{}", prefix, self.next_id)
    }
}

impl MockPaymentProvider {
    /// Create a new mock provider with an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a product to the catalogue.
    pub fn add_product(&self, product: Product) {
        let id = product.id.clone();
        self.inner.lock().unwrap().products.insert(id, product);
    }

    /// Add a price to the catalogue.
    pub fn add_price(&self, price: Price) {
        let id = price.id.clone();
        self.inner.lock().unwrap().prices.insert(id, price);
    }

    /// Archive a product so it can no longer be sold.
    pub fn deactivate_product(&self, product_id: &str) {
        if let Some(product) = self.inner.lock().unwrap().products.get_mut(product_id) {
            product.active = false;
        }
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Check that no payment call of any kind was made.
    pub fn was_untouched(&self) -> bool {
        self.inner.lock().unwrap().call_log.is_empty()
    }

    /// Last request passed to `create_checkout_session`.
    pub fn last_checkout_request(&self) -> Option<CreateCheckoutRequest> {
        self.inner.lock().unwrap().checkout_requests.last().cloned()
    }

    /// Look up a price in the catalogue.
    pub fn price(&self, price_id: &str) -> Option<Price> {
        self.inner.lock().unwrap().prices.get(price_id).cloned()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        let mut state = self.inner.lock().unwrap();
        state.call_log.clear();
        state.checkout_requests.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.inner.lock().unwrap();

        // Check method-specific error first
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Check global error (consumes it)
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        self.record_call(
            "create_customer",
            vec![request.user_id.to_string(), request.email.clone()],
        );
        self.check_error("create_customer")?;

        let mut state = self.inner.lock().unwrap();

        let customer = Customer {
            id: state.generate_id("cus"),
            email: request.email,
            name: request.name,
        };
        state.customers.insert(customer.id.clone(), customer.clone());

        Ok(customer)
    }

    async fn create_product(&self, request: CreateProductRequest) -> Result<Product, PaymentError> {
        self.record_call(
            "create_product",
            vec![request.name.clone(), request.course_id.to_string()],
        );
        self.check_error("create_product")?;

        let mut state = self.inner.lock().unwrap();

        let product = Product {
            id: state.generate_id("prod"),
            name: request.name,
            active: request.active,
        };
        state.products.insert(product.id.clone(), product.clone());

        Ok(product)
    }

    async fn get_product(&self, product_id: &str) -> Result<Option<Product>, PaymentError> {
        self.record_call("get_product", vec![product_id.to_string()]);
        self.check_error("get_product")?;

        Ok(self.inner.lock().unwrap().products.get(product_id).cloned())
    }

    async fn create_price(&self, request: CreatePriceRequest) -> Result<Price, PaymentError> {
        self.record_call(
            "create_price",
            vec![
                request.product_id.clone(),
                request.unit_amount.to_string(),
                request.currency.clone(),
            ],
        );
        self.check_error("create_price")?;

        let mut state = self.inner.lock().unwrap();

        let price = Price {
            id: state.generate_id("price"),
            product_id: request.product_id,
            active: true,
            unit_amount: Some(request.unit_amount),
            currency: request.currency,
        };
        state.prices.insert(price.id.clone(), price.clone());

        Ok(price)
    }

    async fn get_price(&self, price_id: &str) -> Result<Option<Price>, PaymentError> {
        self.record_call("get_price", vec![price_id.to_string()]);
        self.check_error("get_price")?;

        Ok(self.inner.lock().unwrap().prices.get(price_id).cloned())
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.record_call(
            "create_checkout_session",
            vec![request.customer_id.clone(), request.price_id.clone()],
        );
        self.inner
            .lock()
            .unwrap()
            .checkout_requests
            .push(request.clone());
        self.check_error("create_checkout_session")?;

        let mut state = self.inner.lock().unwrap();

        let id = state.generate_id("cs");
        Ok(CheckoutSession {
            url: format!("https://checkout.stripe.com/c/pay/{}", id),
            id,
            expires_at: chrono::Utc::now().timestamp() + 24 * 60 * 60,
        })
    }
}
