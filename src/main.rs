use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use course_checkout::adapters::auth::{JwtConfig, JwtSessionValidator};
use course_checkout::adapters::http::{app_router, AuthState, CoursesAppState};
use course_checkout::adapters::postgres::{
    PostgresCourseRepository, PostgresEnrollmentRepository, PostgresUserRepository,
};
use course_checkout::adapters::rate_limiter::{InMemoryRateLimiter, RedisRateLimiter};
use course_checkout::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use course_checkout::application::{CustomerProvisioner, PaymentPlanProvisioner, RequestGuard};
use course_checkout::config::AppConfig;
use course_checkout::ports::{
    CourseRepository, EnrollmentRepository, PaymentProvider, RateLimiter, UserRepository,
};
use course_checkout::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    telemetry::init(&config.server.log_level, config.is_production());
    config.validate().context("invalid configuration")?;

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .max_lifetime(config.database.max_lifetime())
        .connect(&config.database.url)
        .await
        .context("failed to connect to database")?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;
        tracing::info!("Migrations applied");
    }

    let rate_limiter: Arc<dyn RateLimiter> = match &config.redis {
        Some(redis) => {
            let client = redis::Client::open(redis.url.as_str()).context("invalid redis url")?;
            let conn = tokio::time::timeout(redis.timeout(), client.get_multiplexed_tokio_connection())
                .await
                .context("timed out connecting to redis")?
                .context("failed to connect to redis")?;
            tracing::info!("Rate limiter backed by Redis");
            Arc::new(RedisRateLimiter::new(conn, config.rate_limit.clone()))
        }
        None => {
            tracing::info!("Rate limiter running in-process");
            Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()))
        }
    };

    let payment_provider: Arc<dyn PaymentProvider> = Arc::new(StripePaymentAdapter::new(
        StripeConfig::from_secret(config.payment.stripe_api_key.clone())
            .with_base_url(config.payment.api_base_url.clone()),
    ));

    let courses: Arc<dyn CourseRepository> = Arc::new(PostgresCourseRepository::new(pool.clone()));
    let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
    let enrollments: Arc<dyn EnrollmentRepository> =
        Arc::new(PostgresEnrollmentRepository::new(pool));

    let state = CoursesAppState {
        guard: Arc::new(RequestGuard::new(rate_limiter)),
        course_repository: courses.clone(),
        enrollment_repository: enrollments,
        customer_provisioner: Arc::new(CustomerProvisioner::new(users, payment_provider.clone())),
        plan_provisioner: Arc::new(PaymentPlanProvisioner::new(
            courses,
            payment_provider.clone(),
            config.checkout.currency(),
        )),
        payment_provider,
        base_url: config.checkout.base_url.clone(),
    };

    let auth: AuthState = Arc::new(JwtSessionValidator::new(JwtConfig::new(
        config.auth.jwt_issuer.clone(),
        config.auth.jwt_audience.clone(),
        config.auth.jwt_secret.clone(),
    )));

    let app = app_router(state, auth)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown())
        .await
        .context("server exited with error")?;
    Ok(())
}

async fn shutdown() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
