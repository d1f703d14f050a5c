use sqlx::PgPool;
use tracing::info;

use crate::error::StoreError;

/// Credential storage for the registration flow. Login screens live with the
/// excluded UI; the one behavior owned here is registration with a distinct
/// duplicate-email signal.
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<i64, StoreError> {
        let inserted: Result<i64, sqlx::Error> = sqlx::query_scalar(
            "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING user_id",
        )
        .bind(name)
        .bind(email)
        .bind(password)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(user_id) => {
                info!(user_id, "user registered");
                Ok(user_id)
            }
            Err(err) if StoreError::is_unique_violation(&err) => {
                Err(StoreError::DuplicateEmail(email.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
