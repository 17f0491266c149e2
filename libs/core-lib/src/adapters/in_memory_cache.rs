use crate::{Cache, CoreError};
use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache as MokaCache;
use std::time::{Duration, Instant};

// Cached bytes plus the TTL requested for this particular entry
type Entry = (Vec<u8>, Option<Duration>);

struct PerEntryTtl {
    default_ttl: Duration,
}

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.1.unwrap_or(self.default_ttl))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.1.unwrap_or(self.default_ttl))
    }
}

/// In-memory implementation of the Cache port using Moka.
///
/// Holds session tokens for the single-process deployment. Entries expire
/// after the TTL passed to `set`, or the default TTL when none is given.
#[derive(Clone, Debug)]
pub struct InMemoryCache {
    cache: MokaCache<String, Entry>,
}

impl InMemoryCache {
    pub fn new(max_capacity: u64, default_ttl_seconds: u64) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl {
                default_ttl: Duration::from_secs(default_ttl_seconds),
            })
            .build();
        Self { cache }
    }
}

impl Default for InMemoryCache {
    /// 10,000 entries, one hour default TTL.
    fn default() -> Self {
        Self::new(10_000, 3600)
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        Ok(self.cache.get(key).await.map(|(bytes, _)| bytes))
    }

    async fn set(
        &self,
        key: &str,
        value: &[u8],
        ttl_seconds: Option<u64>,
    ) -> Result<(), CoreError> {
        let ttl = ttl_seconds.map(Duration::from_secs);
        self.cache
            .insert(key.to_string(), (value.to_vec(), ttl))
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CoreError> {
        self.cache.invalidate(key).await;
        Ok(())
    }
}
