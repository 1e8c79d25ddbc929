//! Route cache trait definition.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use waypoint_core::{CacheError, Route};

use super::CacheKey;

/// Shared, immutable snapshot of the route list in repository order.
pub type RouteList = Arc<Vec<Arc<Route>>>;

/// A value held by the route cache.
#[derive(Debug, Clone)]
pub enum CacheValue {
    /// A single resolved route.
    Route(Arc<Route>),
    /// The full route list.
    Routes(RouteList),
}

impl CacheValue {
    /// Returns the route if this value holds one.
    pub fn into_route(self) -> Option<Arc<Route>> {
        match self {
            Self::Route(route) => Some(route),
            Self::Routes(_) => None,
        }
    }

    /// Returns the route list if this value holds one.
    pub fn into_routes(self) -> Option<RouteList> {
        match self {
            Self::Routes(routes) => Some(routes),
            Self::Route(_) => None,
        }
    }
}

/// A key/value cache with per-entry TTL.
///
/// Backends may be local (see `MokaRouteCache`) or remote. Every operation
/// may fail; callers in this crate treat failures as soft and carry on as if
/// the cache had missed or accepted nothing.
#[async_trait]
pub trait RouteCache: Send + Sync {
    /// Reads a value. `Ok(None)` is a miss.
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheValue>, CacheError>;

    /// Stores a value that expires after `ttl`.
    async fn set(&self, key: CacheKey, value: CacheValue, ttl: Duration) -> Result<(), CacheError>;

    /// Removes a value. Removing a missing key is not an error.
    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError>;

    /// Returns the name of this backend, for logging.
    fn name(&self) -> &str;
}
