//! Metrics module for the Waypoint resolver.

pub mod cache;
pub mod resolver;
pub mod setup;

pub use cache::{CacheMetrics, CacheStats};
pub use resolver::{LookupOutcome, ResolverMetrics};
pub use setup::{MetricsSetupError, init_metrics};
