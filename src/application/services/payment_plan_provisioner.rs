//! Payment plan provisioner.
//!
//! A course's plan is an external product plus a one-off price. The cached
//! price is reused only while the price is live, still charges the course's
//! current price, and its product is active. Otherwise a new pair is created
//! and the old one is abandoned, never deleted.

use std::sync::Arc;

use crate::domain::course::Course;
use crate::ports::{
    CourseRepository, CreatePriceRequest, CreateProductRequest, PaymentProvider,
};

use super::ProvisioningError;

/// Ensures a course has a usable external price.
pub struct PaymentPlanProvisioner {
    courses: Arc<dyn CourseRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
    currency: String,
}

impl PaymentPlanProvisioner {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            courses,
            payment_provider,
            currency: currency.into().to_lowercase(),
        }
    }

    /// Returns the price ID checkout should charge for this course.
    pub async fn ensure_plan(&self, course: &Course) -> Result<String, ProvisioningError> {
        if let Some(price_id) = &course.stripe_price_id {
            if self.is_reusable(price_id, course).await? {
                return Ok(price_id.clone());
            }
            tracing::info!(
                course_id = %course.id,
                stale_price_id = %price_id,
                "Cached payment plan is stale, provisioning a new one"
            );
        }

        let product = self
            .payment_provider
            .create_product(CreateProductRequest {
                name: course.title.clone(),
                active: true,
                course_id: course.id,
            })
            .await?;

        let price = self
            .payment_provider
            .create_price(CreatePriceRequest {
                product_id: product.id.clone(),
                unit_amount: course.price_cents,
                currency: self.currency.clone(),
            })
            .await?;

        self.courses.set_price_id(&course.id, &price.id).await?;

        tracing::info!(
            course_id = %course.id,
            product_id = %product.id,
            price_id = %price.id,
            "Payment plan provisioned"
        );

        Ok(price.id)
    }

    async fn is_reusable(&self, price_id: &str, course: &Course) -> Result<bool, ProvisioningError> {
        let Some(price) = self.payment_provider.get_price(price_id).await? else {
            return Ok(false);
        };

        if !price.active
            || price.unit_amount != Some(course.price_cents)
            || !price.currency.eq_ignore_ascii_case(&self.currency)
        {
            return Ok(false);
        }

        let product = self.payment_provider.get_product(&price.product_id).await?;
        Ok(product.map(|p| p.active).unwrap_or(false))
    }
}
