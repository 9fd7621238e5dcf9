//! HTTP adapters - REST API implementations.

pub mod courses;
pub mod middleware;

use axum::{routing::get, Router};

pub use courses::{course_router, CoursesAppState};
pub use middleware::{auth_middleware, AuthState, OptionalAuth};

/// Builds the full API router: course endpoints under `/api`, behind the
/// auth middleware, plus an unauthenticated `/health`.
pub fn app_router(state: CoursesAppState, auth: AuthState) -> Router {
    let api = Router::new()
        .nest("/api", course_router())
        .layer(axum::middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state);

    Router::new().route("/health", get(health)).merge(api)
}

/// GET /health - Liveness probe
async fn health() -> &'static str {
    "ok"
}
