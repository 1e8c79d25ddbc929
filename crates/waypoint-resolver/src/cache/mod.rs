//! Cache module for the Waypoint resolver.
//!
//! This module defines the [`RouteCache`] port, the keys the resolver uses,
//! a Moka-backed implementation with per-entry TTL and metrics, and the
//! bounded record of request paths that have an individual cache entry.

pub mod keys;
pub mod memo;
pub mod moka_cache;
pub mod traits;

// Re-exports
pub use keys::CacheKey;
pub use memo::ResolutionMemo;
pub use moka_cache::{CacheConfig, MokaRouteCache};
pub use traits::{CacheValue, RouteCache, RouteList};
