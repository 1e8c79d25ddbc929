//! Waypoint Resolver - cache-aside route resolution for the Waypoint gateway
//!
//! Resolves inbound request paths to registered routes through an
//! individual-route cache, a cached route list and a route repository, and
//! keeps those caches consistent when routes change.

pub mod cache;
pub mod metrics;
pub mod secrets;
pub mod service;
pub mod settings;

pub use cache::{CacheConfig, CacheKey, CacheValue, MokaRouteCache, RouteCache, RouteList};
pub use service::{ResolverOptions, RouteService};
pub use settings::Settings;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
