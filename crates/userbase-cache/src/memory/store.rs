//! In-memory cache implementation.
//!
//! Plain values go into a moka cache with a per-entry expiry policy; sets are
//! kept in a `DashMap` and never expire.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use moka::Expiry;
use moka::future::Cache;

use userbase_core::config::cache::MemoryCacheConfig;
use userbase_core::result::AppResult;
use userbase_core::traits::cache::CacheProvider;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expires every entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-memory cache provider.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    values: Cache<String, Entry>,
    sets: Arc<DashMap<String, HashSet<String>>>,
    default_ttl: Duration,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig, default_ttl_seconds: u64) -> Self {
        let values = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self {
            values,
            sets: Arc::new(DashMap::new()),
            default_ttl: Duration::from_secs(default_ttl_seconds),
        }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.values.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let entry = Entry {
            value: value.to_string(),
            ttl: if ttl.is_zero() { self.default_ttl } else { ttl },
        };
        self.values.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.values.invalidate(key).await;
        self.sets.remove(key);
        Ok(())
    }

    async fn set_add(&self, key: &str, member: &str) -> AppResult<()> {
        self.sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string());
        Ok(())
    }

    async fn set_remove(&self, key: &str, member: &str) -> AppResult<bool> {
        let mut removed = false;
        // An emptied set disappears, as in Redis.
        self.sets.remove_if_mut(key, |_, members| {
            removed = members.remove(member);
            members.is_empty()
        });
        Ok(removed)
    }

    async fn set_is_member(&self, key: &str, member: &str) -> AppResult<bool> {
        Ok(self
            .sets
            .get(key)
            .is_some_and(|members| members.contains(member)))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
