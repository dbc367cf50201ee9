use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use lru::LruCache;
use serde_json::Value;

use super::{LookupError, LookupSource};

/// Lifetime and size of a [`LookupCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a fetched value stays fresh.
    pub ttl: Duration,
    pub capacity: NonZeroUsize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            capacity: NonZeroUsize::new(256).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

struct CachedValue {
    value: Value,
    fetched_at: Instant,
}

/// Expiring LRU cache in front of a [`LookupSource`].
///
/// Owned by whoever composes the application; there is no shared global
/// cache. Failed fetches are not cached.
pub struct LookupCache<S> {
    source: S,
    config: CacheConfig,
    entries: Mutex<LruCache<(String, String), CachedValue>>,
}

impl<S: LookupSource> LookupCache<S> {
    pub fn new(source: S, config: CacheConfig) -> Self {
        Self {
            source,
            config,
            entries: Mutex::new(LruCache::new(config.capacity)),
        }
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn invalidate(&self, resource_type: &str, index: &str) {
        self.entries()
            .pop(&(resource_type.to_string(), index.to_string()));
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    fn entries(&self) -> MutexGuard<'_, LruCache<(String, String), CachedValue>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fresh(&self, key: &(String, String)) -> Option<Value> {
        let mut entries = self.entries();
        let expired = match entries.get(key) {
            Some(cached) if cached.fetched_at.elapsed() < self.config.ttl => {
                return Some(cached.value.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.pop(key);
        }
        None
    }
}

impl<S: LookupSource> LookupSource for LookupCache<S> {
    fn fetch(&self, resource_type: &str, index: &str) -> Result<Value, LookupError> {
        let key = (resource_type.to_string(), index.to_string());
        if let Some(value) = self.fresh(&key) {
            tracing::trace!(resource_type, index, "lookup cache hit");
            return Ok(value);
        }
        let value = self.source.fetch(resource_type, index)?;
        self.entries().put(
            key,
            CachedValue {
                value: value.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(value)
    }
}
