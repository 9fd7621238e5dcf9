//! PostgreSQL implementation of CourseRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::course::Course;
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::CourseRepository;

const SLUG_CONSTRAINT: &str = "courses_slug_key";

/// PostgreSQL implementation of CourseRepository.
#[derive(Clone)]
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    /// Creates a new PostgresCourseRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn save(&self, course: &Course) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO courses (
                id, title, price_cents, slug, user_id, stripe_price_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(&course.title)
        .bind(course.price_cents)
        .bind(&course.slug)
        .bind(course.user_id.as_str())
        .bind(&course.stripe_price_id)
        .bind(course.created_at.as_datetime())
        .bind(course.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some(SLUG_CONSTRAINT) {
                    return DomainError::new(
                        ErrorCode::CourseSlugTaken,
                        format!("Slug already in use: {}", course.slug),
                    );
                }
            }
            DomainError::database(format!("Failed to save course: {}", e))
        })?;

        Ok(())
    }

    async fn update(&self, course: &Course) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE courses SET
                title = $2,
                price_cents = $3,
                slug = $4,
                stripe_price_id = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(&course.title)
        .bind(course.price_cents)
        .bind(&course.slug)
        .bind(&course.stripe_price_id)
        .bind(course.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update course: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CourseNotFound,
                format!("Course not found: {}", course.id),
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, price_cents, slug, user_id, stripe_price_id, created_at, updated_at
            FROM courses WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch course: {}", e)))?;

        row.map(row_to_course).transpose()
    }

    async fn set_price_id(&self, id: &CourseId, price_id: &str) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE courses SET stripe_price_id = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(price_id)
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to set course price: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CourseNotFound,
                format!("Course not found: {}", id),
            ));
        }

        Ok(())
    }
}

fn row_to_course(row: sqlx::postgres::PgRow) -> Result<Course, DomainError> {
    let id: Uuid = row.get("id");
    let user_id: String = row.get("user_id");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Ok(Course {
        id: CourseId::from_uuid(id),
        title: row.get("title"),
        price_cents: row.get("price_cents"),
        slug: row.get("slug"),
        user_id: UserId::new(user_id)?,
        stripe_price_id: row.get("stripe_price_id"),
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}
