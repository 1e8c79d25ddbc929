//! Route service options.

use std::time::Duration;

use serde::Deserialize;

/// Tuning knobs of the route service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// TTL of every cache entry the service writes, in seconds (default: 300)
    pub ttl_seconds: u64,
    /// Maximum number of request paths remembered by the resolution memo
    pub memo_capacity: u64,
    /// Share one repository load between concurrent list cache misses
    pub coalesce_list_loads: bool,
    /// Treat a route with no methods as allowing every method
    pub empty_methods_allow_all: bool,
}

impl ResolverOptions {
    /// Returns the cache entry TTL.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Builder-style method to set the TTL.
    ///
    /// TTLs are kept in whole seconds; a fractional TTL is rounded up, so a
    /// non-zero duration never becomes an immediately expiring zero.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_seconds = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
        self
    }

    /// Builder-style method to enable load coalescing.
    pub fn with_coalesced_loads(mut self, enabled: bool) -> Self {
        self.coalesce_list_loads = enabled;
        self
    }

    /// Builder-style method to set the empty method set policy.
    pub fn with_empty_methods_allow_all(mut self, allow_all: bool) -> Self {
        self.empty_methods_allow_all = allow_all;
        self
    }
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            memo_capacity: 10_000,
            coalesce_list_loads: false,
            empty_methods_allow_all: false,
        }
    }
}
