//! Instrumented stand-ins for the resolver's ports.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use waypoint_core::{CacheError, PathMatcher, PatternMatcher, RepositoryError, Route};
use waypoint_resolver::cache::{CacheKey, CacheValue, RouteCache};
use waypoint_store::{MemoryRouteRepository, RouteRepository};

/// Memory repository that counts list loads and can be switched to fail.
#[derive(Default)]
pub struct CountingRepository {
    inner: MemoryRouteRepository,
    loads: AtomicUsize,
    failing: AtomicBool,
    load_delay: Mutex<Option<Duration>>,
}

impl CountingRepository {
    pub fn with_routes(routes: impl IntoIterator<Item = Route>) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryRouteRepository::with_routes(routes).unwrap(),
            ..Self::default()
        })
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes every list load sleep before answering.
    pub fn set_load_delay(&self, delay: Duration) {
        *self.load_delay.lock() = Some(delay);
    }

    pub fn stored(&self, path: &str) -> Option<Route> {
        self.inner.get(path)
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::unavailable("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl RouteRepository for CountingRepository {
    async fn get_routes(&self) -> Result<Vec<Route>, RepositoryError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let delay = *self.load_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check()?;
        self.inner.get_routes().await
    }

    async fn add_route(&self, route: &Route) -> Result<(), RepositoryError> {
        self.check()?;
        self.inner.add_route(route).await
    }

    async fn update_route(&self, route: &Route) -> Result<(), RepositoryError> {
        self.check()?;
        self.inner.update_route(route).await
    }

    async fn delete_route(&self, path: &str) -> Result<(), RepositoryError> {
        self.check()?;
        self.inner.delete_route(path).await
    }

    async fn update_metrics(
        &self,
        path: &str,
        call_count: i64,
        total_response_time: i64,
    ) -> Result<(), RepositoryError> {
        self.check()?;
        self.inner
            .update_metrics(path, call_count, total_response_time)
            .await
    }

    fn name(&self) -> &str {
        "counting"
    }
}

/// Pattern matcher that counts how often it is consulted.
#[derive(Debug, Default)]
pub struct CountingMatcher {
    calls: AtomicUsize,
}

impl CountingMatcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PathMatcher for CountingMatcher {
    fn matches(&self, pattern: &str, path: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        PatternMatcher.matches(pattern, path)
    }
}

/// Cache whose every operation fails.
#[derive(Debug, Default)]
pub struct FailingCache;

#[async_trait]
impl RouteCache for FailingCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<CacheValue>, CacheError> {
        Err(CacheError::unavailable("cache down"))
    }

    async fn set(&self, _key: CacheKey, _value: CacheValue, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::unavailable("cache down"))
    }

    async fn delete(&self, _key: &CacheKey) -> Result<(), CacheError> {
        Err(CacheError::unavailable("cache down"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Plain map cache that ignores TTLs and can be inspected directly.
#[derive(Default)]
pub struct MapCache {
    entries: Mutex<HashMap<CacheKey, CacheValue>>,
    deletes: Mutex<Vec<CacheKey>>,
}

impl MapCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().contains_key(key)
    }

    pub fn peek(&self, key: &CacheKey) -> Option<CacheValue> {
        self.entries.lock().get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, value: CacheValue) {
        self.entries.lock().insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn deleted(&self) -> Vec<CacheKey> {
        self.deletes.lock().clone()
    }
}

#[async_trait]
impl RouteCache for MapCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheValue>, CacheError> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: CacheKey, value: CacheValue, _ttl: Duration) -> Result<(), CacheError> {
        self.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError> {
        self.entries.lock().remove(key);
        self.deletes.lock().push(key.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "map"
    }
}
