//! Integration tests for the enrollment checkout flow.
//!
//! These tests drive the application handlers end to end against the
//! in-memory repositories and the mock payment provider:
//! 1. Course creation is admin-only and rate limited
//! 2. Re-enrollment of an active user makes no payment calls
//! 3. Each attempt snapshots the course's current price
//! 4. Payment plans are provisioned once and replaced when stale
//! 5. Payment failures leave the enrollment in an explicit final state

use std::sync::Arc;

use course_checkout::adapters::memory::{
    InMemoryCourseRepository, InMemoryEnrollmentRepository, InMemoryUserRepository,
};
use course_checkout::adapters::rate_limiter::InMemoryRateLimiter;
use course_checkout::adapters::stripe::MockPaymentProvider;
use course_checkout::application::{
    ActionResult, CreateCourseCommand, CreateCourseHandler, CustomerProvisioner,
    EnrollInCourseCommand, EnrollInCourseHandler, EnrollmentOutcome, PaymentPlanProvisioner,
    RequestGuard,
};
use course_checkout::domain::course::{Course, CourseError, NewCourse};
use course_checkout::domain::enrollment::{Enrollment, EnrollmentError, EnrollmentStatus};
use course_checkout::domain::foundation::{AuthenticatedUser, CourseId, UserId, UserRole};
use course_checkout::ports::{
    CourseRepository, EnrollmentRepository, PaymentError, PaymentProvider, Price, Product,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    create_course: CreateCourseHandler,
    enroll: EnrollInCourseHandler,
    courses: Arc<InMemoryCourseRepository>,
    enrollments: InMemoryEnrollmentRepository,
    payments: MockPaymentProvider,
}

impl TestApp {
    fn new() -> Self {
        let courses = Arc::new(InMemoryCourseRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let enrollments = InMemoryEnrollmentRepository::new();
        let payments = MockPaymentProvider::new();
        let provider: Arc<dyn PaymentProvider> = Arc::new(payments.clone());
        let guard = Arc::new(RequestGuard::new(Arc::new(InMemoryRateLimiter::with_defaults())));

        let create_course = CreateCourseHandler::new(guard.clone(), courses.clone());
        let enroll = EnrollInCourseHandler::new(
            guard,
            courses.clone(),
            Arc::new(enrollments.clone()),
            Arc::new(CustomerProvisioner::new(users, provider.clone())),
            Arc::new(PaymentPlanProvisioner::new(courses.clone(), provider.clone(), "usd")),
            provider,
            "https://learn.example.com",
        );

        Self {
            create_course,
            enroll,
            courses,
            enrollments,
            payments,
        }
    }

    async fn seed_course(&self, slug: &str, price_cents: i64) -> Course {
        let course = Course::create(
            CourseId::new(),
            UserId::new("admin-1").unwrap(),
            NewCourse {
                title: format!("Course {}", slug),
                price_cents,
                slug: slug.to_string(),
            },
        );
        self.courses.save(&course).await.unwrap();
        course
    }

    async fn stored_course(&self, id: &CourseId) -> Course {
        self.courses.find_by_id(id).await.unwrap().unwrap()
    }

    async fn stored_enrollment(&self, user: &AuthenticatedUser, course_id: &CourseId) -> Enrollment {
        self.enrollments
            .find_by_user_and_course(&user.id, course_id)
            .await
            .unwrap()
            .unwrap()
    }

    async fn enroll(
        &self,
        user: &AuthenticatedUser,
        course_id: CourseId,
    ) -> Result<EnrollmentOutcome, EnrollmentError> {
        self.enroll
            .handle(EnrollInCourseCommand {
                caller: Some(user.clone()),
                user_agent: Some("Mozilla/5.0 (X11; Linux x86_64)".to_string()),
                course_id,
            })
            .await
    }
}

fn student(id: &str) -> AuthenticatedUser {
    AuthenticatedUser::new(
        UserId::new(id).unwrap(),
        format!("{}@example.com", id),
        Some("Student".to_string()),
    )
}

fn admin() -> AuthenticatedUser {
    AuthenticatedUser::new(UserId::new("admin-1").unwrap(), "admin@example.com", None)
        .with_role(UserRole::Admin)
}

fn new_course(slug: &str) -> NewCourse {
    NewCourse {
        title: "Systems Programming".to_string(),
        price_cents: 12_900,
        slug: slug.to_string(),
    }
}

// =============================================================================
// Course Creation
// =============================================================================

#[tokio::test]
async fn non_admin_cannot_create_course_even_with_valid_payload() {
    let app = TestApp::new();

    let result = app
        .create_course
        .handle(CreateCourseCommand {
            caller: Some(student("user-1")),
            user_agent: None,
            payload: new_course("systems-programming"),
        })
        .await;

    assert_eq!(result, ActionResult::error("Only admins can create courses"));
    assert_eq!(app.courses.count().await, 0);
}

#[tokio::test]
async fn created_course_can_be_enrolled_in() {
    let app = TestApp::new();

    let course = app
        .create_course
        .execute(CreateCourseCommand {
            caller: Some(admin()),
            user_agent: None,
            payload: new_course("systems-programming"),
        })
        .await
        .unwrap();

    let outcome = app.enroll(&student("user-1"), course.id).await.unwrap();

    let url = outcome.redirect_url().unwrap();
    assert!(url.starts_with("https://checkout.stripe.com/c/pay/"));
}

#[tokio::test]
async fn course_creation_and_enrollment_share_one_window() {
    let app = TestApp::new();
    let admin = admin();

    for i in 0..5 {
        app.create_course
            .execute(CreateCourseCommand {
                caller: Some(admin.clone()),
                user_agent: None,
                payload: new_course(&format!("course-{}", i)),
            })
            .await
            .unwrap();
    }

    let course = app.seed_course("extra", 1000).await;
    let result = app.enroll(&admin, course.id).await;

    assert!(matches!(result, Err(EnrollmentError::RateLimited { .. })));
    assert!(app.payments.was_untouched());
}

#[tokio::test]
async fn create_course_errors_are_typed() {
    let app = TestApp::new();

    let result = app
        .create_course
        .execute(CreateCourseCommand {
            caller: None,
            user_agent: None,
            payload: new_course("systems-programming"),
        })
        .await;

    assert_eq!(result.unwrap_err(), CourseError::Unauthorized { signed_in: false });
}

// =============================================================================
// Rate Limiting
// =============================================================================

#[tokio::test]
async fn sixth_enrollment_attempt_in_a_minute_is_rate_limited() {
    let app = TestApp::new();
    let course = app.seed_course("rust-101", 4900).await;
    let user = student("user-1");

    for _ in 0..5 {
        app.enroll(&user, course.id).await.unwrap();
    }
    let result = app.enroll(&user, course.id).await;

    let err = result.unwrap_err();
    assert!(matches!(err, EnrollmentError::RateLimited { retry_after_secs } if retry_after_secs > 0));
    assert_eq!(err.message(), "Too many requests. Please try again later");
}

#[tokio::test]
async fn rate_limit_is_per_user() {
    let app = TestApp::new();
    let course = app.seed_course("rust-101", 4900).await;

    for _ in 0..5 {
        app.enroll(&student("user-1"), course.id).await.unwrap();
    }

    assert!(app.enroll(&student("user-2"), course.id).await.is_ok());
}

// =============================================================================
// Already Enrolled
// =============================================================================

#[tokio::test]
async fn active_enrollment_makes_no_plan_or_checkout_calls() {
    let app = TestApp::new();
    let course = app.seed_course("rust-101", 4900).await;
    let user = student("user-1");

    app.enroll(&user, course.id).await.unwrap();
    let mut enrollment = app.stored_enrollment(&user, &course.id).await;
    enrollment.activate().unwrap();
    app.enrollments.update(&enrollment).await.unwrap();
    app.payments.clear_calls();

    let outcome = app.enroll(&user, course.id).await.unwrap();

    assert_eq!(outcome, EnrollmentOutcome::AlreadyEnrolled);
    assert!(outcome.redirect_url().is_none());
    assert_eq!(app.payments.call_count("get_price"), 0);
    assert_eq!(app.payments.call_count("create_product"), 0);
    assert_eq!(app.payments.call_count("create_price"), 0);
    assert_eq!(app.payments.call_count("create_checkout_session"), 0);
    assert_eq!(app.payments.call_count("create_customer"), 0);
}

// =============================================================================
// Price Snapshots
// =============================================================================

#[tokio::test]
async fn reattempt_snapshots_the_current_price() {
    let app = TestApp::new();
    let course = app.seed_course("rust-101", 1000).await;
    let user = student("user-1");

    app.enroll(&user, course.id).await.unwrap();
    let first = app.stored_enrollment(&user, &course.id).await;
    assert_eq!(first.status, EnrollmentStatus::Pending);
    assert_eq!(first.amount_cents, 1000);

    let mut repriced = app.stored_course(&course.id).await;
    repriced.change_price(2000).unwrap();
    app.courses.update(&repriced).await.unwrap();

    app.enroll(&user, course.id).await.unwrap();
    let second = app.stored_enrollment(&user, &course.id).await;

    assert_eq!(second.id, first.id);
    assert_eq!(second.status, EnrollmentStatus::Pending);
    assert_eq!(second.amount_cents, 2000);
    assert_eq!(app.enrollments.count().await, 1);

    // The stale 1000-cent plan is superseded, not reused.
    let checkout = app.payments.last_checkout_request().unwrap();
    assert_eq!(app.payments.price(&checkout.price_id).unwrap().unit_amount, Some(2000));
}

// =============================================================================
// Payment Plans
// =============================================================================

#[tokio::test]
async fn missing_plan_creates_exactly_one_product_and_price() {
    let app = TestApp::new();
    let course = app.seed_course("rust-101", 4900).await;

    app.enroll(&student("user-1"), course.id).await.unwrap();

    assert_eq!(app.payments.call_count("create_product"), 1);
    assert_eq!(app.payments.call_count("create_price"), 1);
    let stored = app.stored_course(&course.id).await;
    let price_id = stored.stripe_price_id.expect("price id persisted");
    assert_eq!(app.payments.last_checkout_request().unwrap().price_id, price_id);
}

#[tokio::test]
async fn live_plan_is_reused_across_students() {
    let app = TestApp::new();
    let course = app.seed_course("rust-101", 4900).await;

    app.enroll(&student("user-1"), course.id).await.unwrap();
    app.enroll(&student("user-2"), course.id).await.unwrap();

    assert_eq!(app.payments.call_count("create_product"), 1);
    assert_eq!(app.payments.call_count("create_price"), 1);
    assert_eq!(app.payments.call_count("create_checkout_session"), 2);
}

#[tokio::test]
async fn inactive_product_gets_a_new_plan() {
    let app = TestApp::new();
    let course = app.seed_course("rust-101", 4900).await;
    app.payments.add_product(Product {
        id: "prod_archived".to_string(),
        name: course.title.clone(),
        active: false,
    });
    app.payments.add_price(Price {
        id: "price_archived".to_string(),
        product_id: "prod_archived".to_string(),
        active: true,
        unit_amount: Some(4900),
        currency: "usd".to_string(),
    });
    app.courses.set_price_id(&course.id, "price_archived").await.unwrap();

    app.enroll(&student("user-1"), course.id).await.unwrap();

    assert_eq!(app.payments.call_count("create_product"), 1);
    assert_eq!(app.payments.call_count("create_price"), 1);
    let stored = app.stored_course(&course.id).await;
    assert_ne!(stored.stripe_price_id.as_deref(), Some("price_archived"));
    assert_eq!(
        app.payments.last_checkout_request().unwrap().price_id,
        stored.stripe_price_id.unwrap()
    );
}

// =============================================================================
// Payment Failures
// =============================================================================

#[tokio::test]
async fn amount_too_small_is_a_successful_enrollment() {
    let app = TestApp::new();
    let course = app.seed_course("free-sample", 25).await;
    let user = student("user-1");
    app.payments.set_method_error(
        "create_checkout_session",
        PaymentError::amount_too_small("Amount must be at least $0.50 usd"),
    );

    let outcome = app.enroll(&user, course.id).await.unwrap();

    assert_eq!(outcome.to_action_result(), ActionResult::success("Successfully enrolled"));
    assert_eq!(
        app.stored_enrollment(&user, &course.id).await.status,
        EnrollmentStatus::Active
    );

    // Now active, so a later attempt short-circuits.
    app.payments.clear_errors();
    assert_eq!(
        app.enroll(&user, course.id).await.unwrap(),
        EnrollmentOutcome::AlreadyEnrolled
    );
}

#[tokio::test]
async fn other_payment_errors_embed_the_processor_message() {
    let app = TestApp::new();
    let course = app.seed_course("rust-101", 4900).await;
    let user = student("user-1");
    app.payments.set_method_error(
        "create_product",
        PaymentError::provider("Stripe is temporarily unavailable").with_http_status(503),
    );

    let err = app.enroll(&user, course.id).await.unwrap_err();

    assert_eq!(err.message(), "Payment error: Stripe is temporarily unavailable");
    assert_eq!(
        app.stored_enrollment(&user, &course.id).await.status,
        EnrollmentStatus::Cancelled
    );
    assert!(app.stored_course(&course.id).await.stripe_price_id.is_none());
}

#[tokio::test]
async fn pending_row_is_committed_before_checkout_and_cancelled_on_failure() {
    let app = TestApp::new();
    let course = app.seed_course("rust-101", 4900).await;
    let user = student("user-1");
    app.payments.set_method_error(
        "create_checkout_session",
        PaymentError::network("connection reset by peer"),
    );
    app.enrollments.fail_updates(true);

    let err = app.enroll(&user, course.id).await.unwrap_err();

    // Compensation failed, so the committed Pending row is still there.
    assert!(matches!(err, EnrollmentError::PaymentFailed { .. }));
    assert_eq!(
        app.stored_enrollment(&user, &course.id).await.status,
        EnrollmentStatus::Pending
    );

    app.enrollments.fail_updates(false);
    app.payments.clear_errors();
    let outcome = app.enroll(&user, course.id).await.unwrap();
    assert!(outcome.redirect_url().is_some());
    assert_eq!(app.enrollments.count().await, 1);
}

#[tokio::test]
async fn unknown_course_is_a_not_found_result() {
    let app = TestApp::new();

    let err = app.enroll(&student("user-1"), CourseId::new()).await.unwrap_err();

    assert_eq!(err.message(), "Course not found");
    assert!(app.payments.was_untouched());
}
