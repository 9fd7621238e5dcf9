//! Application services shared by the command handlers.

mod customer_provisioner;
mod errors;
mod payment_plan_provisioner;
mod request_guard;

pub use customer_provisioner::CustomerProvisioner;
pub use errors::ProvisioningError;
pub use payment_plan_provisioner::PaymentPlanProvisioner;
pub use request_guard::{RequestGuard, Requirement};
