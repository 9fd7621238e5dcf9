//! HTTP handlers for the course endpoints.
//!
//! These handlers connect axum routes to the application command handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};

use crate::adapters::http::middleware::OptionalAuth;
use crate::application::{
    ActionResult, CreateCourseCommand, CreateCourseHandler, CustomerProvisioner,
    EnrollInCourseCommand, EnrollInCourseHandler, PaymentPlanProvisioner, RequestGuard,
    Requirement,
};
use crate::domain::course::CourseError;
use crate::domain::enrollment::EnrollmentError;
use crate::domain::foundation::CourseId;
use crate::ports::{CourseRepository, EnrollmentRepository, PaymentProvider};

use super::dto::{CourseCreatedResponse, CreateCourseRequest};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state. Every field is a process-wide singleton.
#[derive(Clone)]
pub struct CoursesAppState {
    pub guard: Arc<RequestGuard>,
    pub course_repository: Arc<dyn CourseRepository>,
    pub enrollment_repository: Arc<dyn EnrollmentRepository>,
    pub customer_provisioner: Arc<CustomerProvisioner>,
    pub plan_provisioner: Arc<PaymentPlanProvisioner>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    /// Public origin used for checkout return URLs.
    pub base_url: String,
}

impl CoursesAppState {
    pub fn create_course_handler(&self) -> CreateCourseHandler {
        CreateCourseHandler::new(self.guard.clone(), self.course_repository.clone())
    }

    pub fn enroll_handler(&self) -> EnrollInCourseHandler {
        EnrollInCourseHandler::new(
            self.guard.clone(),
            self.course_repository.clone(),
            self.enrollment_repository.clone(),
            self.customer_provisioner.clone(),
            self.plan_provisioner.clone(),
            self.payment_provider.clone(),
            self.base_url.clone(),
        )
    }
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/courses - Create a course (admin only)
pub async fn create_course(
    State(state): State<CoursesAppState>,
    OptionalAuth(caller): OptionalAuth,
    headers: HeaderMap,
    payload: Result<Json<CreateCourseRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CourseApiError> {
    // Unparseable bodies still go through the admin and rate limit checks first.
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            state
                .guard
                .admit(caller, Requirement::Admin, user_agent(&headers))
                .await
                .map_err(CourseError::from)?;
            tracing::debug!(error = %rejection, "Malformed course payload");
            return Err(CourseError::InvalidInput.into());
        }
    };

    let handler = state.create_course_handler();
    let cmd = CreateCourseCommand {
        caller,
        user_agent: user_agent(&headers),
        payload: request.into(),
    };

    let course = handler.execute(cmd).await?;

    let body = CourseCreatedResponse::new(ActionResult::success("Course created successfully"), &course);
    Ok((StatusCode::CREATED, Json(body)))
}

/// POST /api/courses/:course_id/enroll - Start checkout for a course
///
/// Redirects (303) to the hosted checkout page, or answers with a result
/// object when no checkout is needed.
pub async fn enroll_in_course(
    State(state): State<CoursesAppState>,
    OptionalAuth(caller): OptionalAuth,
    headers: HeaderMap,
    Path(course_id): Path<String>,
) -> Result<Response, EnrollmentApiError> {
    // Unparseable IDs cannot name a course, but the caller is admitted first.
    let course_id: CourseId = match course_id.parse() {
        Ok(id) => id,
        Err(_) => {
            state
                .guard
                .admit(caller, Requirement::SignedIn, user_agent(&headers))
                .await
                .map_err(EnrollmentError::from)?;
            return Err(EnrollmentError::course_not_found(CourseId::new()).into());
        }
    };

    let handler = state.enroll_handler();
    let cmd = EnrollInCourseCommand {
        caller,
        user_agent: user_agent(&headers),
        course_id,
    };

    let outcome = handler.handle(cmd).await?;

    Ok(match outcome.redirect_url() {
        Some(url) => Redirect::to(url).into_response(),
        None => (StatusCode::OK, Json(outcome.to_action_result())).into_response(),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

fn error_response(status: StatusCode, message: String, retry_after: Option<u32>) -> Response {
    let mut response = (status, Json(ActionResult::error(message))).into_response();
    if let Some(secs) = retry_after {
        if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
    }
    response
}

/// API error wrapper for course creation.
#[derive(Debug)]
pub struct CourseApiError(CourseError);

impl From<CourseError> for CourseApiError {
    fn from(err: CourseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for CourseApiError {
    fn into_response(self) -> Response {
        let (status, retry_after) = match &self.0 {
            CourseError::Unauthorized { signed_in: false } => (StatusCode::UNAUTHORIZED, None),
            CourseError::Unauthorized { signed_in: true } => (StatusCode::FORBIDDEN, None),
            CourseError::RateLimited { retry_after_secs } => {
                (StatusCode::TOO_MANY_REQUESTS, Some(*retry_after_secs))
            }
            CourseError::SuspectedBot => (StatusCode::FORBIDDEN, None),
            CourseError::InvalidInput => (StatusCode::BAD_REQUEST, None),
            CourseError::OperationFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };
        error_response(status, self.0.message(), retry_after)
    }
}

/// API error wrapper for enrollment.
#[derive(Debug)]
pub struct EnrollmentApiError(EnrollmentError);

impl From<EnrollmentError> for EnrollmentApiError {
    fn from(err: EnrollmentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for EnrollmentApiError {
    fn into_response(self) -> Response {
        let (status, retry_after) = match &self.0 {
            EnrollmentError::Unauthorized => (StatusCode::UNAUTHORIZED, None),
            EnrollmentError::RateLimited { retry_after_secs } => {
                (StatusCode::TOO_MANY_REQUESTS, Some(*retry_after_secs))
            }
            EnrollmentError::SuspectedBot => (StatusCode::FORBIDDEN, None),
            EnrollmentError::CourseNotFound(_) => (StatusCode::NOT_FOUND, None),
            EnrollmentError::PaymentFailed { .. } => (StatusCode::BAD_GATEWAY, None),
            EnrollmentError::OperationFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };
        error_response(status, self.0.message(), retry_after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_course_error_sets_retry_after() {
        let response = CourseApiError(CourseError::RateLimited { retry_after_secs: 42 }).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "42");
    }

    #[test]
    fn non_admin_is_forbidden() {
        let response =
            CourseApiError(CourseError::Unauthorized { signed_in: true }).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn payment_failure_is_bad_gateway() {
        let err = EnrollmentError::payment_failed(None, "Your card was declined.");
        let response = EnrollmentApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }

    #[test]
    fn missing_course_is_not_found() {
        let response =
            EnrollmentApiError(EnrollmentError::course_not_found(CourseId::new())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn user_agent_is_read_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(user_agent(&headers), None);
        headers.insert(header::USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        assert_eq!(user_agent(&headers).as_deref(), Some("Mozilla/5.0"));
    }
}
