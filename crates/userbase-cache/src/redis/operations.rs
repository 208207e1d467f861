//! Redis cache provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use userbase_core::error::{AppError, ErrorKind};
use userbase_core::result::AppResult;
use userbase_core::traits::cache::CacheProvider;

use super::client::RedisClient;

/// Redis-backed cache provider.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    client: RedisClient,
    default_ttl: Duration,
}

impl RedisCacheProvider {
    /// Create a new Redis cache provider.
    pub fn new(client: RedisClient, default_ttl_seconds: u64) -> Self {
        Self {
            client,
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }

    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.client.conn();
        conn.get(self.client.prefixed_key(key))
            .await
            .map_err(Self::map_err)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let mut conn = self.client.conn();
        let ttl = if ttl.is_zero() { self.default_ttl } else { ttl };
        // SET EX rejects 0.
        let seconds = ttl.as_secs().max(1);
        let _: () = conn
            .set_ex(self.client.prefixed_key(key), value, seconds)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.client.conn();
        let _: () = conn
            .del(self.client.prefixed_key(key))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn set_add(&self, key: &str, member: &str) -> AppResult<()> {
        let mut conn = self.client.conn();
        let _: () = conn
            .sadd(self.client.prefixed_key(key), member)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn set_remove(&self, key: &str, member: &str) -> AppResult<bool> {
        let mut conn = self.client.conn();
        let removed: u64 = conn
            .srem(self.client.prefixed_key(key), member)
            .await
            .map_err(Self::map_err)?;
        Ok(removed > 0)
    }

    async fn set_is_member(&self, key: &str, member: &str) -> AppResult<bool> {
        let mut conn = self.client.conn();
        conn.sismember(self.client.prefixed_key(key), member)
            .await
            .map_err(Self::map_err)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
