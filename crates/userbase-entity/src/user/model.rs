//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account.
///
/// The whole record, password hash included, is what gets cached under
/// `Cache:User:{id}`; API responses go through a separate DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email, always trimmed and lowercase.
    pub email: String,
    /// Argon2 password hash.
    pub password: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Disabled accounts cannot use access tokens.
    pub is_active: bool,
    /// Super users may manage other accounts and see all items.
    pub is_super_user: bool,
    /// Whether the email address has been confirmed.
    pub verified: bool,
    /// Outstanding verification code, if any.
    pub verification_code: Option<String>,
    /// Outstanding password reset token, if any.
    pub password_reset_token: Option<String>,
    /// Instant after which `password_reset_token` stops being accepted.
    pub password_reset_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether a pending reset token is still usable at `now`.
    pub fn reset_token_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.password_reset_token.is_some()
            && self.password_reset_at.is_some_and(|expiry| expiry >= now)
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Display name.
    pub name: String,
    /// Email (normalized by the caller).
    pub email: String,
    /// Pre-hashed password.
    pub password: String,
    pub is_active: bool,
    pub is_super_user: bool,
    pub verified: bool,
}

/// Profile fields an administrator or the user may change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New display name.
    pub name: Option<String>,
}

/// Trim and lowercase an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "hash".into(),
            created_at: now,
            updated_at: now,
            is_active: true,
            is_super_user: false,
            verified: true,
            verification_code: None,
            password_reset_token: None,
            password_reset_at: None,
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM \n"), "ada@example.com");
    }

    #[test]
    fn test_reset_token_valid_until_expiry_inclusive() {
        let now = Utc::now();
        let mut u = user();
        u.password_reset_token = Some("abc".into());
        u.password_reset_at = Some(now);

        assert!(u.reset_token_valid_at(now));
        assert!(u.reset_token_valid_at(now - Duration::minutes(1)));
        assert!(!u.reset_token_valid_at(now + Duration::seconds(1)));
    }

    #[test]
    fn test_reset_token_invalid_without_token() {
        let mut u = user();
        u.password_reset_at = Some(Utc::now() + Duration::minutes(15));
        assert!(!u.reset_token_valid_at(Utc::now()));
    }
}
