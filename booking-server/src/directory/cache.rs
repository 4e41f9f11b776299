//! Caching layer for directory display names.
//!
//! Station, train and user names are immutable from this service's point of
//! view, so they are cached for a short TTL. Existence checks always go to
//! the underlying directory: an entity can be removed at any time and a
//! booking must not be validated against stale data.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{StationId, TrainId, UserId};
use crate::store::StoreError;

use super::Directory;

/// Cache key: which kind of entity, and its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NameKey {
    Station(StationId),
    Train(TrainId),
    User(UserId),
}

/// Configuration for the name cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached names.
    pub ttl: Duration,

    /// Maximum number of cached names.
    pub max_capacity: u64,
}

impl CacheConfig {
    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set a custom capacity.
    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 10_000,
        }
    }
}

/// Directory with cached name lookups.
///
/// Wraps any `Directory`. Only names that were found are cached; a miss is
/// always re-fetched.
#[derive(Clone)]
pub struct CachedDirectory<D> {
    inner: D,
    names: MokaCache<NameKey, String>,
}

impl<D: Directory> CachedDirectory<D> {
    /// Create a new cached directory with the given configuration.
    pub fn new(inner: D, config: &CacheConfig) -> Self {
        let names = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, names }
    }

    /// Invalidate all cached names.
    pub fn invalidate_all(&self) {
        self.names.invalidate_all();
    }

    async fn cached_or_fetch<F>(&self, key: NameKey, fetch: F) -> Result<Option<String>, StoreError>
    where
        F: Future<Output = Result<Option<String>, StoreError>>,
    {
        if let Some(name) = self.names.get(&key).await {
            return Ok(Some(name));
        }

        let name = fetch.await?;
        if let Some(name) = &name {
            self.names.insert(key, name.clone()).await;
        }
        Ok(name)
    }
}

impl<D: Directory> Directory for CachedDirectory<D> {
    async fn station_exists(&self, id: &StationId) -> Result<bool, StoreError> {
        self.inner.station_exists(id).await
    }

    async fn station_name(&self, id: &StationId) -> Result<Option<String>, StoreError> {
        self.cached_or_fetch(NameKey::Station(id.clone()), self.inner.station_name(id))
            .await
    }

    async fn train_exists(&self, id: &TrainId) -> Result<bool, StoreError> {
        self.inner.train_exists(id).await
    }

    async fn train_name(&self, id: &TrainId) -> Result<Option<String>, StoreError> {
        self.cached_or_fetch(NameKey::Train(id.clone()), self.inner.train_name(id))
            .await
    }

    async fn user_name(&self, id: &UserId) -> Result<Option<String>, StoreError> {
        self.cached_or_fetch(NameKey::User(id.clone()), self.inner.user_name(id))
            .await
    }
}
