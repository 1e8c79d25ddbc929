//! In-process route cache using Moka.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use serde::Deserialize;
use waypoint_core::CacheError;

use super::{CacheKey, CacheValue, RouteCache};
use crate::metrics::CacheMetrics;

/// Cache configuration.
///
/// Entry TTLs are chosen by the writer, see [`RouteCache::set`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries (default: 10000)
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: CacheValue,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<CacheKey, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &CacheKey, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Route cache backed by Moka.
/// Thread-safe and async-friendly. Operations never fail.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use waypoint_core::Route;
/// use waypoint_resolver::cache::{CacheConfig, CacheKey, CacheValue, MokaRouteCache, RouteCache};
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache = MokaRouteCache::new(CacheConfig::default());
/// let route = Arc::new(Route::new("/users/:id", "http://users"));
///
/// cache
///     .set(CacheKey::route("/users/:id"), CacheValue::Route(route), Duration::from_secs(60))
///     .await
///     .unwrap();
/// assert!(cache.get(&CacheKey::route("/users/:id")).await.unwrap().is_some());
/// # }
/// ```
#[derive(Clone)]
pub struct MokaRouteCache {
    inner: Cache<CacheKey, Entry>,
    metrics: CacheMetrics,
}

impl MokaRouteCache {
    /// Creates a new cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        let metrics = CacheMetrics::new();

        let eviction_metrics = metrics.clone();
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .eviction_listener(move |key, _value, cause| {
                let reason = match cause {
                    moka::notification::RemovalCause::Expired => "ttl",
                    moka::notification::RemovalCause::Size => "capacity",
                    moka::notification::RemovalCause::Explicit => "manual",
                    moka::notification::RemovalCause::Replaced => "replaced",
                };
                eviction_metrics.record_eviction(&key, reason);
            })
            .build();

        Self { inner, metrics }
    }

    /// Returns the approximate number of entries.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Invalidates all entries.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Returns the metrics for external access.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Runs pending maintenance so entry counts and evictions are up to date.
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }

    fn update_entry_gauge(&self) {
        self.metrics.update_entry_count(self.inner.entry_count());
    }
}

#[async_trait]
impl RouteCache for MokaRouteCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheValue>, CacheError> {
        let start = Instant::now();
        let result = self.inner.get(key).await.map(|entry| entry.value);

        self.metrics.record_lookup(key, result.is_some());
        self.metrics
            .record_operation("get", key.kind(), start.elapsed());
        Ok(result)
    }

    async fn set(&self, key: CacheKey, value: CacheValue, ttl: Duration) -> Result<(), CacheError> {
        let start = Instant::now();
        let kind = key.kind();
        self.inner.insert(key, Entry { value, ttl }).await;

        self.metrics.record_operation("set", kind, start.elapsed());
        self.update_entry_gauge();
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.inner.invalidate(key).await;
        self.update_entry_gauge();
        Ok(())
    }

    fn name(&self) -> &str {
        "moka"
    }
}

impl std::fmt::Debug for MokaRouteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaRouteCache")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use waypoint_core::Route;

    fn route_value(path: &str) -> CacheValue {
        CacheValue::Route(Arc::new(Route::new(path, "http://backend")))
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MokaRouteCache::new(CacheConfig::default());
        let key = CacheKey::route("/users/:id");

        cache
            .set(key.clone(), route_value("/users/:id"), Duration::from_secs(60))
            .await
            .unwrap();

        let cached = cache.get(&key).await.unwrap().and_then(CacheValue::into_route);
        assert_eq!(cached.unwrap().path, "/users/:id");
        assert_eq!(cache.metrics().stats().route_hits, 1);
    }

    #[tokio::test]
    async fn test_miss_returns_none() {
        let cache = MokaRouteCache::new(CacheConfig::default());

        assert!(cache.get(&CacheKey::routes()).await.unwrap().is_none());
        assert_eq!(cache.metrics().stats().list_misses, 1);
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let cache = MokaRouteCache::new(CacheConfig::default());
        let key = CacheKey::route("/a");

        cache
            .set(key.clone(), route_value("/a"), Duration::from_secs(60))
            .await
            .unwrap();
        cache.delete(&key).await.unwrap();
        cache.sync().await;

        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let cache = MokaRouteCache::new(CacheConfig::default());
        assert!(cache.delete(&CacheKey::route("/missing")).await.is_ok());
    }

    #[tokio::test]
    async fn test_entry_expires_after_its_ttl() {
        let cache = MokaRouteCache::new(CacheConfig::default());
        let key = CacheKey::route("/short");

        cache
            .set(key.clone(), route_value("/short"), Duration::from_millis(50))
            .await
            .unwrap();
        cache
            .set(CacheKey::route("/long"), route_value("/long"), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(cache.get(&key).await.unwrap().is_none());
        assert!(cache.get(&CacheKey::route("/long")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let cache = MokaRouteCache::new(CacheConfig::default());
        let key = CacheKey::route("/a");

        cache
            .set(key.clone(), route_value("/a"), Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set(
                key.clone(),
                CacheValue::Route(Arc::new(Route::new("/a", "http://v2"))),
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let cached = cache.get(&key).await.unwrap().and_then(CacheValue::into_route);
        assert_eq!(cached.unwrap().service_url, "http://v2");
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = MokaRouteCache::new(CacheConfig::default());
        for i in 0..5 {
            let path = format!("/r{}", i);
            cache
                .set(CacheKey::route(&path), route_value(&path), Duration::from_secs(60))
                .await
                .unwrap();
        }

        cache.invalidate_all();
        cache.sync().await;

        assert_eq!(cache.entry_count(), 0);
        assert!(cache.get(&CacheKey::route("/r0")).await.unwrap().is_none());
    }
}
