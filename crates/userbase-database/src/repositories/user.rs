//! PostgreSQL user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use userbase_core::error::{AppError, ErrorKind};
use userbase_core::result::AppResult;
use userbase_entity::user::{CreateUser, UpdateUser, User};

use crate::directory::UserDirectory;

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn not_found(row: Option<User>, what: &str) -> AppResult<User> {
    row.ok_or_else(|| AppError::not_found(format!("User not found by {what}")))
}

fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user by id"))?;
        not_found(row, "id")
    }

    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user by email"))?;
        not_found(row, "email")
    }

    async fn find_by_verification_code(&self, code: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE verification_code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find user by verification code"))?;
        not_found(row, "verification code")
    }

    async fn find_by_reset_token(&self, token: &str, now: DateTime<Utc>) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE password_reset_token = $1 AND password_reset_at >= $2",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find user by reset token"))?;
        not_found(row, "reset token")
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password, is_active, is_super_user, verified) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password)
        .bind(data.is_active)
        .bind(data.is_super_user)
        .bind(data.verified)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("users_email_key") => {
                AppError::conflict("Email already in use")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })
    }

    async fn update_profile(&self, id: Uuid, data: &UpdateUser) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>(
            "UPDATE users SET name = COALESCE($2, name), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update user"))?;
        not_found(row, "id")
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>(
            "UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update password"))?;
        not_found(row, "id")
    }

    async fn update_verification_code(&self, id: Uuid, code: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>(
            "UPDATE users SET verification_code = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update verification code"))?;
        not_found(row, "id")
    }

    async fn update_verification(&self, id: Uuid, code: &str, verified: bool) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>(
            "UPDATE users SET verification_code = NULLIF($2, ''), verified = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(code)
        .bind(verified)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to update verification"))?;
        not_found(row, "id")
    }

    async fn update_password_reset(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>(
            "UPDATE users SET password_reset_token = $2, password_reset_at = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(token)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to store password reset token"))?;
        not_found(row, "id")
    }

    async fn reset_password(&self, id: Uuid, password_hash: &str) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>(
            "UPDATE users SET password = $2, password_reset_token = NULL, password_reset_at = NULL, \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to reset password"))?;
        not_found(row, "id")
    }

    async fn list(&self, offset: i64, limit: i64) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at ASC LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list users"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>("DELETE FROM users WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to delete user"))?;
        not_found(row, "id")
    }
}
