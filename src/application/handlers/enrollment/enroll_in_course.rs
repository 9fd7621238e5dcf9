//! EnrollInCourseHandler - Command handler for starting a course checkout.
//!
//! The enrollment row is committed as Pending before the payment processor
//! is contacted. If provisioning or checkout then fails, a compensating
//! update moves the row to its final status:
//!
//! | Failure | Row | Outcome |
//! |---------|-----|---------|
//! | `amount_too_small` | Active | `Enrolled` |
//! | other payment error | Cancelled | `PaymentFailed` |
//! | anything else | Cancelled | `OperationFailed` |

use std::sync::Arc;

use crate::application::services::{
    CustomerProvisioner, PaymentPlanProvisioner, ProvisioningError, RequestGuard, Requirement,
};
use crate::application::ActionResult;
use crate::domain::course::Course;
use crate::domain::enrollment::{Enrollment, EnrollmentAttempt, EnrollmentError, EnrollmentStatus};
use crate::domain::foundation::{AuthenticatedUser, CourseId, EnrollmentId};
use crate::ports::{
    CheckoutMetadata, CheckoutSession, CourseRepository, CreateCheckoutRequest,
    EnrollmentRepository, PaymentError, PaymentProvider,
};

/// Command to enroll the caller in a course.
#[derive(Debug, Clone)]
pub struct EnrollInCourseCommand {
    /// Signed-in caller, if any.
    pub caller: Option<AuthenticatedUser>,
    /// User agent of the originating request.
    pub user_agent: Option<String>,
    pub course_id: CourseId,
}

/// How a successful enrollment attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentOutcome {
    /// The caller already had access. No payment calls were made.
    AlreadyEnrolled,

    /// A checkout session is waiting; redirect the caller to it.
    CheckoutCreated {
        enrollment_id: EnrollmentId,
        checkout_url: String,
    },

    /// Access was granted without checkout (charge below processor minimum).
    Enrolled { enrollment_id: EnrollmentId },
}

impl EnrollmentOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            EnrollmentOutcome::AlreadyEnrolled => "You are already enrolled in this course",
            EnrollmentOutcome::CheckoutCreated { .. } => "Redirecting to checkout",
            EnrollmentOutcome::Enrolled { .. } => "Successfully enrolled",
        }
    }

    /// The checkout URL to redirect to, if any.
    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            EnrollmentOutcome::CheckoutCreated { checkout_url, .. } => Some(checkout_url),
            _ => None,
        }
    }

    pub fn to_action_result(&self) -> ActionResult {
        ActionResult::success(self.message())
    }
}

/// Handler for enrolling in a course.
pub struct EnrollInCourseHandler {
    guard: Arc<RequestGuard>,
    courses: Arc<dyn CourseRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    customers: Arc<CustomerProvisioner>,
    plans: Arc<PaymentPlanProvisioner>,
    payment_provider: Arc<dyn PaymentProvider>,
    base_url: String,
}

impl EnrollInCourseHandler {
    pub fn new(
        guard: Arc<RequestGuard>,
        courses: Arc<dyn CourseRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        customers: Arc<CustomerProvisioner>,
        plans: Arc<PaymentPlanProvisioner>,
        payment_provider: Arc<dyn PaymentProvider>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            guard,
            courses,
            enrollments,
            customers,
            plans,
            payment_provider,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn handle(
        &self,
        cmd: EnrollInCourseCommand,
    ) -> Result<EnrollmentOutcome, EnrollmentError> {
        // 1. Authenticate + rate limit
        let user = self
            .guard
            .admit(cmd.caller, Requirement::SignedIn, cmd.user_agent)
            .await?;

        // 2. Course lookup
        let course = self
            .courses
            .find_by_id(&cmd.course_id)
            .await?
            .ok_or(EnrollmentError::course_not_found(cmd.course_id))?;

        // 3. External customer
        let customer_id = self
            .customers
            .ensure_customer(&user)
            .await
            .map_err(|e| self.provisioning_error(&course, e))?;

        // 4. Pending row, committed before any payment plan or checkout call
        let attempt = self
            .enrollments
            .begin_attempt(&user.id, &course.id, course.price_cents)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, course_id = %course.id, error = %e, "Enrollment transaction failed");
                EnrollmentError::from(e)
            })?;

        let mut enrollment = match attempt {
            EnrollmentAttempt::AlreadyActive(_) => {
                tracing::info!(user_id = %user.id, course_id = %course.id, "Already enrolled");
                return Ok(EnrollmentOutcome::AlreadyEnrolled);
            }
            EnrollmentAttempt::Pending(enrollment) => enrollment,
        };

        // 5. Plan + checkout
        match self.start_checkout(&course, &customer_id, &enrollment).await {
            Ok(session) => {
                tracing::info!(
                    user_id = %user.id,
                    course_id = %course.id,
                    enrollment_id = %enrollment.id,
                    session_id = %session.id,
                    amount_cents = enrollment.amount_cents,
                    "Checkout session created"
                );
                Ok(EnrollmentOutcome::CheckoutCreated {
                    enrollment_id: enrollment.id,
                    checkout_url: session.url,
                })
            }
            Err(ProvisioningError::Payment(e)) if e.is_amount_too_small() => {
                tracing::info!(
                    enrollment_id = %enrollment.id,
                    amount_cents = enrollment.amount_cents,
                    "Charge below processor minimum, enrolling without checkout"
                );
                self.compensate(&mut enrollment, EnrollmentStatus::Active).await;
                Ok(EnrollmentOutcome::Enrolled {
                    enrollment_id: enrollment.id,
                })
            }
            Err(e) => {
                let err = self.provisioning_error(&course, e);
                self.compensate(&mut enrollment, EnrollmentStatus::Cancelled).await;
                Err(err)
            }
        }
    }

    async fn start_checkout(
        &self,
        course: &Course,
        customer_id: &str,
        enrollment: &Enrollment,
    ) -> Result<CheckoutSession, ProvisioningError> {
        let price_id = self.plans.ensure_plan(course).await?;

        let session = self
            .payment_provider
            .create_checkout_session(CreateCheckoutRequest {
                customer_id: customer_id.to_string(),
                price_id,
                quantity: 1,
                success_url: format!(
                    "{}/courses/{}?checkout=success&session_id={{CHECKOUT_SESSION_ID}}",
                    self.base_url, course.slug
                ),
                cancel_url: format!("{}/courses/{}?checkout=cancelled", self.base_url, course.slug),
                metadata: CheckoutMetadata {
                    user_id: enrollment.user_id.clone(),
                    course_id: enrollment.course_id,
                    enrollment_id: enrollment.id,
                },
            })
            .await?;

        Ok(session)
    }

    /// Moves a committed Pending row to its final status. Failures are
    /// logged; the caller's outcome stands regardless.
    async fn compensate(&self, enrollment: &mut Enrollment, target: EnrollmentStatus) {
        let transition = match target {
            EnrollmentStatus::Active => enrollment.activate(),
            _ => enrollment.cancel(),
        };
        if let Err(e) = transition {
            tracing::error!(enrollment_id = %enrollment.id, error = %e, "Invalid compensating transition");
            return;
        }

        if let Err(e) = self.enrollments.update(enrollment).await {
            tracing::error!(
                enrollment_id = %enrollment.id,
                status = %target,
                error = %e,
                "Compensating enrollment update failed"
            );
        }
    }

    fn provisioning_error(&self, course: &Course, err: ProvisioningError) -> EnrollmentError {
        match err {
            ProvisioningError::Payment(e) => {
                log_payment_error(course, &e);
                EnrollmentError::payment_failed(e.provider_code, e.message)
            }
            ProvisioningError::Store(e) => {
                tracing::error!(course_id = %course.id, error = %e, "Enrollment failed");
                EnrollmentError::operation_failed(e.message)
            }
        }
    }
}

fn log_payment_error(course: &Course, err: &PaymentError) {
    tracing::error!(
        course_id = %course.id,
        error_type = err.error_type.as_deref().unwrap_or("unknown"),
        code = err.provider_code.as_deref().unwrap_or("none"),
        message = %err.message,
        status = err.http_status.unwrap_or(0),
        "Payment processor error"
    );
}
