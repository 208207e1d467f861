//! In-process `UserDirectory` keyed by id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use userbase_core::error::AppError;
use userbase_core::result::AppResult;
use userbase_entity::user::{CreateUser, UpdateUser, User};

use super::UserDirectory;

/// A `UserDirectory` held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: DashMap<Uuid, User>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record as-is.
    pub fn insert(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// Snapshot of the stored record, bypassing any cache.
    pub fn get(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).map(|u| u.clone())
    }

    fn find_where(&self, pred: impl Fn(&User) -> bool, what: &str) -> AppResult<User> {
        self.users
            .iter()
            .find(|entry| pred(entry.value()))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("User not found by {what}")))
    }

    fn modify(&self, id: Uuid, f: impl FnOnce(&mut User)) -> AppResult<User> {
        let mut entry = self
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        f(entry.value_mut());
        entry.updated_at = Utc::now();
        Ok(entry.value().clone())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> AppResult<User> {
        self.get(id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        self.find_where(|u| u.email == email, "email")
    }

    async fn find_by_verification_code(&self, code: &str) -> AppResult<User> {
        self.find_where(
            |u| u.verification_code.as_deref() == Some(code),
            "verification code",
        )
    }

    async fn find_by_reset_token(&self, token: &str, now: DateTime<Utc>) -> AppResult<User> {
        self.find_where(
            |u| u.password_reset_token.as_deref() == Some(token) && u.reset_token_valid_at(now),
            "reset token",
        )
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        if self.users.iter().any(|u| u.email == data.email) {
            return Err(AppError::conflict("Email already in use"));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            email: data.email.clone(),
            password: data.password.clone(),
            created_at: now,
            updated_at: now,
            is_active: data.is_active,
            is_super_user: data.is_super_user,
            verified: data.verified,
            verification_code: None,
            password_reset_token: None,
            password_reset_at: None,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, data: &UpdateUser) -> AppResult<User> {
        self.modify(id, |u| {
            if let Some(name) = &data.name {
                u.name = name.clone();
            }
        })
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<User> {
        self.modify(id, |u| u.password = password_hash.to_string())
    }

    async fn update_verification_code(&self, id: Uuid, code: &str) -> AppResult<User> {
        self.modify(id, |u| u.verification_code = Some(code.to_string()))
    }

    async fn update_verification(&self, id: Uuid, code: &str, verified: bool) -> AppResult<User> {
        self.modify(id, |u| {
            u.verification_code = (!code.is_empty()).then(|| code.to_string());
            u.verified = verified;
        })
    }

    async fn update_password_reset(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<User> {
        self.modify(id, |u| {
            u.password_reset_token = Some(token.to_string());
            u.password_reset_at = Some(expires_at);
        })
    }

    async fn reset_password(&self, id: Uuid, password_hash: &str) -> AppResult<User> {
        self.modify(id, |u| {
            u.password = password_hash.to_string();
            u.password_reset_token = None;
            u.password_reset_at = None;
        })
    }

    async fn list(&self, offset: i64, limit: i64) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn delete(&self, id: Uuid) -> AppResult<User> {
        self.users
            .remove(&id)
            .map(|(_, user)| user)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use userbase_core::error::ErrorKind;

    fn new_user(email: &str) -> CreateUser {
        CreateUser {
            name: "Test".into(),
            email: email.into(),
            password: "hash".into(),
            is_active: true,
            is_super_user: false,
            verified: false,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let dir = InMemoryUserDirectory::new();
        dir.create(&new_user("a@b.com")).await.unwrap();
        let err = dir.create(&new_user("a@b.com")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_reset_token_lookup_respects_expiry() {
        let dir = InMemoryUserDirectory::new();
        let user = dir.create(&new_user("a@b.com")).await.unwrap();
        let now = Utc::now();
        dir.update_password_reset(user.id, "tok", now + Duration::minutes(15))
            .await
            .unwrap();

        assert!(dir.find_by_reset_token("tok", now).await.is_ok());
        let err = dir
            .find_by_reset_token("tok", now + Duration::minutes(16))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_verification_clears_code() {
        let dir = InMemoryUserDirectory::new();
        let user = dir.create(&new_user("a@b.com")).await.unwrap();
        dir.update_verification_code(user.id, "code").await.unwrap();
        let updated = dir.update_verification(user.id, "", true).await.unwrap();
        assert!(updated.verified);
        assert!(updated.verification_code.is_none());
        assert!(dir.find_by_verification_code("code").await.is_err());
    }
}
