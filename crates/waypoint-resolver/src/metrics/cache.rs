//! Route cache metrics.
//!
//! Every series carries a `kind` label naming the key shape it was recorded
//! for, `routes` (the full list) or `route` (a single resolved path), so the
//! two tiers can be told apart on a dashboard.

use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::cache::CacheKey;

/// Registers the cache metric descriptions.
pub fn register_cache_metrics() {
    metrics::describe_counter!(
        "waypoint_cache_hits_total",
        "Route cache hits, by key kind"
    );
    metrics::describe_counter!(
        "waypoint_cache_misses_total",
        "Route cache misses, by key kind"
    );
    metrics::describe_counter!(
        "waypoint_cache_evictions_total",
        "Route cache removals, by key kind and reason"
    );
    metrics::describe_gauge!("waypoint_cache_entries", "Entries held by the route cache");
    metrics::describe_histogram!(
        "waypoint_cache_operation_seconds",
        "Route cache operation latency, by operation and key kind"
    );
}

#[derive(Debug, Default)]
struct TierCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TierCounters {
    fn load(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}

/// Hit and miss totals per cache tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub list_hits: u64,
    pub list_misses: u64,
    pub route_hits: u64,
    pub route_misses: u64,
}

/// Cache metrics recorder shared by a cache and its eviction listener.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    list: Arc<TierCounters>,
    route: Arc<TierCounters>,
}

impl CacheMetrics {
    /// Creates a recorder with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    fn tier(&self, key: &CacheKey) -> &TierCounters {
        match key {
            CacheKey::Routes => &self.list,
            CacheKey::Route(_) => &self.route,
        }
    }

    /// Records the result of a read of `key`.
    pub fn record_lookup(&self, key: &CacheKey, hit: bool) {
        let tier = self.tier(key);
        if hit {
            tier.hits.fetch_add(1, Ordering::Relaxed);
            counter!("waypoint_cache_hits_total", "kind" => key.kind()).increment(1);
        } else {
            tier.misses.fetch_add(1, Ordering::Relaxed);
            counter!("waypoint_cache_misses_total", "kind" => key.kind()).increment(1);
        }
    }

    /// Records an entry leaving the cache.
    pub fn record_eviction(&self, key: &CacheKey, reason: &'static str) {
        counter!(
            "waypoint_cache_evictions_total",
            "kind" => key.kind(),
            "reason" => reason
        )
        .increment(1);
    }

    /// Sets the entries gauge.
    pub fn update_entry_count(&self, count: u64) {
        gauge!("waypoint_cache_entries").set(count as f64);
    }

    /// Records how long `operation` on a key of `kind` took.
    pub fn record_operation(&self, operation: &'static str, kind: &'static str, duration: Duration) {
        histogram!(
            "waypoint_cache_operation_seconds",
            "operation" => operation,
            "kind" => kind
        )
        .record(duration.as_secs_f64());
    }

    /// Returns the hit and miss totals recorded so far.
    pub fn stats(&self) -> CacheStats {
        let (list_hits, list_misses) = self.list.load();
        let (route_hits, route_misses) = self.route.load();
        CacheStats {
            list_hits,
            list_misses,
            route_hits,
            route_misses,
        }
    }
}
