//! The route entity.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A registered gateway route.
///
/// `path` is the unique identifier of a route inside a repository and may
/// contain placeholders understood by a [`PathMatcher`](crate::PathMatcher).
/// Counters are only changed through the repository's metrics update and are
/// never consulted during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Registered path pattern (e.g. `/users/:id`).
    pub path: String,

    /// Destination service. Opaque to the resolver.
    #[serde(rename = "serviceURL")]
    pub service_url: String,

    /// Allowed method tokens. Empty means unspecified.
    #[serde(default)]
    pub methods: IndexSet<String>,

    /// Whether the route is enabled. Surfaced, never filtered on.
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Number of calls recorded for this route.
    #[serde(default)]
    pub call_count: i64,

    /// Accumulated response time for this route, in milliseconds.
    #[serde(default)]
    pub total_response_time: i64,
}

fn default_true() -> bool {
    true
}

impl Route {
    /// Creates an active route with no methods and zeroed counters.
    ///
    /// # Example
    ///
    /// ```
    /// use waypoint_core::Route;
    ///
    /// let route = Route::new("/users/:id", "http://users.internal")
    ///     .with_methods(["GET", "PUT"]);
    /// assert!(route.allows_method("GET"));
    /// assert!(!route.allows_method("DELETE"));
    /// ```
    pub fn new(path: impl Into<String>, service_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            service_url: service_url.into(),
            methods: IndexSet::new(),
            is_active: true,
            call_count: 0,
            total_response_time: 0,
        }
    }

    /// Builder-style method to set the allowed methods.
    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style method to set the active flag.
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Returns true if `method` is in the route's method set.
    ///
    /// Tokens are compared exactly. An empty set allows nothing.
    pub fn allows_method(&self, method: &str) -> bool {
        self.methods.contains(method)
    }

    /// Average response time per call, if any call was recorded.
    pub fn average_response_time(&self) -> Option<f64> {
        if self.call_count <= 0 {
            return None;
        }
        Some(self.total_response_time as f64 / self.call_count as f64)
    }

    /// Checks the structural invariants a store relies on.
    ///
    /// Returns the reason for rejection, if any.
    pub fn validate(&self) -> Result<(), String> {
        if self.path.is_empty() {
            return Err("path cannot be empty".to_string());
        }
        if !self.path.starts_with('/') {
            return Err("path must start with '/'".to_string());
        }
        if self.service_url.trim().is_empty() {
            return Err("service URL cannot be empty".to_string());
        }
        Ok(())
    }
}
