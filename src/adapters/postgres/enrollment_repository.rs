//! PostgreSQL implementation of EnrollmentRepository.
//!
//! `begin_attempt` locks the (user, course) row with `SELECT ... FOR UPDATE`
//! and upserts against the unique (user_id, course_id) index, so concurrent
//! first attempts converge on one row. The lock covers nothing when no row
//! exists yet, so the upsert itself refuses to touch an Active row: a racing
//! attempt that finds one reports `AlreadyActive`.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::enrollment::{Enrollment, EnrollmentAttempt, EnrollmentStatus};
use crate::domain::foundation::{
    CourseId, DomainError, EnrollmentId, ErrorCode, Timestamp, UserId,
};
use crate::ports::EnrollmentRepository;

const ENROLLMENT_COLUMNS: &str =
    "id, user_id, course_id, status, amount_cents, created_at, updated_at";

/// Insert-or-reset of the (user, course) row. `$8` is the Active status,
/// which is never overwritten; such a conflict returns no row.
fn upsert_sql() -> String {
    format!(
        r#"
        INSERT INTO enrollments ({cols})
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (user_id, course_id) DO UPDATE SET
            status = EXCLUDED.status,
            amount_cents = EXCLUDED.amount_cents,
            updated_at = EXCLUDED.updated_at
        WHERE enrollments.status <> $8
        RETURNING {cols}
        "#,
        cols = ENROLLMENT_COLUMNS
    )
}

/// Turns the upsert's outcome into an attempt.
///
/// `upserted` is the row returned by the upsert; `current` is the row read
/// back when the upsert was skipped.
fn settle_upsert(
    upserted: Option<Enrollment>,
    current: Option<Enrollment>,
) -> Result<EnrollmentAttempt, DomainError> {
    match (upserted, current) {
        (Some(enrollment), _) => Ok(EnrollmentAttempt::Pending(enrollment)),
        (None, Some(enrollment)) if enrollment.status.grants_access() => {
            Ok(EnrollmentAttempt::AlreadyActive(enrollment))
        }
        (None, _) => Err(DomainError::database(
            "Enrollment upsert returned no row for a non-active enrollment",
        )),
    }
}

/// PostgreSQL implementation of EnrollmentRepository.
#[derive(Clone)]
pub struct PostgresEnrollmentRepository {
    pool: PgPool,
}

impl PostgresEnrollmentRepository {
    /// Creates a new PostgresEnrollmentRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnrollmentRepository for PostgresEnrollmentRepository {
    async fn begin_attempt(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
        amount_cents: i64,
    ) -> Result<EnrollmentAttempt, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::database(format!("Failed to begin transaction: {}", e))
        })?;

        let existing = sqlx::query(&format!(
            "SELECT {} FROM enrollments WHERE user_id = $1 AND course_id = $2 FOR UPDATE",
            ENROLLMENT_COLUMNS
        ))
        .bind(user_id.as_str())
        .bind(course_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database(format!("Failed to lock enrollment: {}", e)))?
        .map(row_to_enrollment)
        .transpose()?;

        let attempt = Enrollment::begin_attempt(
            existing,
            user_id.clone(),
            *course_id,
            amount_cents,
            Timestamp::now(),
        );

        let attempt = match attempt {
            EnrollmentAttempt::AlreadyActive(enrollment) => {
                EnrollmentAttempt::AlreadyActive(enrollment)
            }
            EnrollmentAttempt::Pending(enrollment) => {
                let upserted = sqlx::query(&upsert_sql())
                    .bind(enrollment.id.as_uuid())
                    .bind(enrollment.user_id.as_str())
                    .bind(enrollment.course_id.as_uuid())
                    .bind(enrollment.status.as_str())
                    .bind(enrollment.amount_cents)
                    .bind(enrollment.created_at.as_datetime())
                    .bind(enrollment.updated_at.as_datetime())
                    .bind(EnrollmentStatus::Active.as_str())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| {
                        DomainError::database(format!("Failed to upsert enrollment: {}", e))
                    })?
                    .map(row_to_enrollment)
                    .transpose()?;

                // A concurrent first attempt activated the row after our lock
                // found nothing; the skipped upsert still locked it.
                let current = match upserted {
                    Some(_) => None,
                    None => sqlx::query(&format!(
                        "SELECT {} FROM enrollments WHERE user_id = $1 AND course_id = $2",
                        ENROLLMENT_COLUMNS
                    ))
                    .bind(user_id.as_str())
                    .bind(course_id.as_uuid())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| {
                        DomainError::database(format!("Failed to fetch enrollment: {}", e))
                    })?
                    .map(row_to_enrollment)
                    .transpose()?,
                };

                settle_upsert(upserted, current)?
            }
        };

        tx.commit().await.map_err(|e| {
            DomainError::database(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(attempt)
    }

    async fn find_by_user_and_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM enrollments WHERE user_id = $1 AND course_id = $2",
            ENROLLMENT_COLUMNS
        ))
        .bind(user_id.as_str())
        .bind(course_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch enrollment: {}", e)))?;

        row.map(row_to_enrollment).transpose()
    }

    async fn update(&self, enrollment: &Enrollment) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE enrollments SET
                status = $2,
                amount_cents = $3,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(enrollment.id.as_uuid())
        .bind(enrollment.status.as_str())
        .bind(enrollment.amount_cents)
        .bind(enrollment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update enrollment: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::EnrollmentNotFound,
                format!("Enrollment not found: {}", enrollment.id),
            ));
        }

        Ok(())
    }
}

fn row_to_enrollment(row: sqlx::postgres::PgRow) -> Result<Enrollment, DomainError> {
    let id: Uuid = row.get("id");
    let user_id: String = row.get("user_id");
    let course_id: Uuid = row.get("course_id");
    let status: String = row.get("status");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Ok(Enrollment {
        id: EnrollmentId::from_uuid(id),
        user_id: UserId::new(user_id)?,
        course_id: CourseId::from_uuid(course_id),
        status: status.parse::<EnrollmentStatus>()?,
        amount_cents: row.get("amount_cents"),
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(status: EnrollmentStatus) -> Enrollment {
        let mut enrollment = Enrollment::pending(
            UserId::new("user-1").unwrap(),
            CourseId::new(),
            1000,
            Timestamp::now(),
        );
        enrollment.status = status;
        enrollment
    }

    #[test]
    fn upsert_never_overwrites_the_active_row() {
        let sql = upsert_sql();
        assert!(sql.contains("ON CONFLICT (user_id, course_id) DO UPDATE"));
        assert!(sql.contains("WHERE enrollments.status <> $8"));
        assert_eq!(EnrollmentStatus::Active.as_str(), "active");
    }

    #[test]
    fn returned_row_is_a_pending_attempt() {
        let row = enrollment(EnrollmentStatus::Pending);
        let attempt = settle_upsert(Some(row.clone()), None).unwrap();
        assert_eq!(attempt, EnrollmentAttempt::Pending(row));
    }

    #[test]
    fn skipped_upsert_over_active_row_is_already_active() {
        let row = enrollment(EnrollmentStatus::Active);
        let attempt = settle_upsert(None, Some(row.clone())).unwrap();
        assert_eq!(attempt, EnrollmentAttempt::AlreadyActive(row));
        assert!(!attempt.needs_write());
    }

    #[test]
    fn skipped_upsert_without_active_row_is_an_error() {
        assert!(settle_upsert(None, None).is_err());
        assert!(settle_upsert(None, Some(enrollment(EnrollmentStatus::Cancelled))).is_err());
    }
}
