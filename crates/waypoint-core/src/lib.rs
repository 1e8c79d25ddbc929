//! Waypoint Core - Domain types for gateway route resolution
//!
//! This crate provides the route entity, the path matching port with its
//! default pattern grammar, and the error hierarchy shared by the store and
//! the resolver.

pub mod error;
pub mod matcher;
pub mod route;

pub use error::{CacheError, RepositoryError, Result, RouteError};
pub use matcher::{PathMatcher, PatternMatcher};
pub use route::Route;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
