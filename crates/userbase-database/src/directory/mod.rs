//! The `UserDirectory` seam: durable user lookups and the narrow set of
//! writes the account workflows perform.
//!
//! [`crate::repositories::UserRepository`] is the PostgreSQL implementation;
//! [`memory::InMemoryUserDirectory`] backs unit and HTTP tests. Items get the
//! same treatment through [`items::ItemStore`].

pub mod items;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use userbase_core::result::AppResult;
use userbase_entity::user::{CreateUser, UpdateUser, User};

pub use items::{InMemoryItemStore, ItemStore};
pub use memory::InMemoryUserDirectory;

/// Durable store of user accounts.
///
/// Every lookup fails with `ErrorKind::NotFound` when no row matches, and
/// every write returns the updated record.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<User>;

    /// Lookup by already-normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<User>;

    async fn find_by_verification_code(&self, code: &str) -> AppResult<User>;

    /// Lookup by reset token whose expiry instant is at or after `now`.
    async fn find_by_reset_token(&self, token: &str, now: DateTime<Utc>) -> AppResult<User>;

    /// Insert a new user. A duplicate email fails with `ErrorKind::Conflict`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    async fn update_profile(&self, id: Uuid, data: &UpdateUser) -> AppResult<User>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<User>;

    async fn update_verification_code(&self, id: Uuid, code: &str) -> AppResult<User>;

    /// Store the verification outcome. An empty `code` clears it.
    async fn update_verification(&self, id: Uuid, code: &str, verified: bool) -> AppResult<User>;

    async fn update_password_reset(
        &self,
        id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<User>;

    /// Persist a new password hash and clear the reset token and its expiry.
    async fn reset_password(&self, id: Uuid, password_hash: &str) -> AppResult<User>;

    /// Page through users ordered by creation time.
    async fn list(&self, offset: i64, limit: i64) -> AppResult<Vec<User>>;

    /// Delete a user, returning the removed record.
    async fn delete(&self, id: Uuid) -> AppResult<User>;
}
