//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::UserAccount;
use crate::ports::UserRepository;

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        let row = sqlx::query(
            "SELECT id, email, name, stripe_customer_id FROM users WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch user: {}", e)))?;

        match row {
            Some(row) => {
                let id: String = row.get("id");
                Ok(Some(UserAccount {
                    id: UserId::new(id)?,
                    email: row.get("email"),
                    name: row.get("name"),
                    stripe_customer_id: row.get("stripe_customer_id"),
                }))
            }
            None => Ok(None),
        }
    }

    async fn upsert(&self, account: &UserAccount) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, stripe_customer_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                name = EXCLUDED.name,
                stripe_customer_id = COALESCE(users.stripe_customer_id, EXCLUDED.stripe_customer_id),
                updated_at = NOW()
            "#,
        )
        .bind(account.id.as_str())
        .bind(&account.email)
        .bind(&account.name)
        .bind(&account.stripe_customer_id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to upsert user: {}", e)))?;

        Ok(())
    }
}
