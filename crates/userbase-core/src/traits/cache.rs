//! Cache provider trait for pluggable caching backends.
//!
//! The auth core uses a cache both as a plain key/value store (cached user
//! profiles with a TTL) and as a set store (the refresh tokens currently
//! registered for a user). Every removal is idempotent: deleting a missing
//! key or removing a missing member succeeds.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for cache backends (Redis or in-memory).
///
/// All values are strings (JSON for structured records). The provider is
/// responsible for key prefixing and TTL enforcement.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL. A zero TTL means the provider's default.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key (plain value or set). Missing keys are not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Add a member to the set stored at `key`. Sets have no TTL.
    async fn set_add(&self, key: &str, member: &str) -> AppResult<()>;

    /// Remove a member from the set stored at `key`.
    ///
    /// Returns `true` if the member was present. Only one of several
    /// concurrent removals of the same member observes `true`.
    async fn set_remove(&self, key: &str, member: &str) -> AppResult<bool>;

    /// Check whether `member` belongs to the set stored at `key`.
    async fn set_is_member(&self, key: &str, member: &str) -> AppResult<bool>;

    /// Check that the cache backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
