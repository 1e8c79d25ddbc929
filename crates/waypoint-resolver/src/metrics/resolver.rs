//! Route resolution metrics.

use metrics::{counter, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// How a route lookup ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Served from the individual-route cache.
    CacheHit,
    /// Resolved by scanning the route list.
    PatternMatch,
    /// Scanned the whole list without a match.
    NotFound,
    /// The repository failed.
    Error,
}

impl LookupOutcome {
    /// Value of the `outcome` metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CacheHit => "cache_hit",
            Self::PatternMatch => "pattern_match",
            Self::NotFound => "not_found",
            Self::Error => "error",
        }
    }
}

/// Registers the resolver metric descriptions.
pub fn register_resolver_metrics() {
    metrics::describe_counter!(
        "waypoint_route_lookups_total",
        "Total number of route lookups by outcome"
    );
    metrics::describe_histogram!(
        "waypoint_route_lookup_seconds",
        "Time spent resolving a request path"
    );
    metrics::describe_counter!(
        "waypoint_repository_loads_total",
        "Total number of route list loads from the repository"
    );
    metrics::describe_counter!(
        "waypoint_cache_errors_total",
        "Cache failures absorbed by the resolver"
    );
}

/// Recorder used by the route service.
///
/// The local counters exist so tests and operators can read them without a
/// global recorder installed.
#[derive(Debug, Clone, Default)]
pub struct ResolverMetrics {
    repository_loads: Arc<AtomicU64>,
    cache_errors: Arc<AtomicU64>,
}

impl ResolverMetrics {
    /// Creates a recorder with zeroed local counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finished lookup
    pub fn record_lookup(&self, outcome: LookupOutcome, duration: Duration) {
        counter!("waypoint_route_lookups_total", "outcome" => outcome.as_str()).increment(1);
        histogram!("waypoint_route_lookup_seconds", "outcome" => outcome.as_str())
            .record(duration.as_secs_f64());
    }

    /// Records a route list load from the repository
    pub fn record_repository_load(&self) {
        self.repository_loads.fetch_add(1, Ordering::Relaxed);
        counter!("waypoint_repository_loads_total").increment(1);
    }

    /// Records a cache failure that was absorbed
    pub fn record_cache_error(&self, operation: &'static str) {
        self.cache_errors.fetch_add(1, Ordering::Relaxed);
        counter!("waypoint_cache_errors_total", "operation" => operation).increment(1);
    }

    /// Number of route list loads from the repository so far.
    pub fn repository_loads(&self) -> u64 {
        self.repository_loads.load(Ordering::Relaxed)
    }

    /// Number of cache failures absorbed so far.
    pub fn cache_errors(&self) -> u64 {
        self.cache_errors.load(Ordering::Relaxed)
    }
}
