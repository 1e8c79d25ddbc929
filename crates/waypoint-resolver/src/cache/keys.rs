//! Cache key generation.

use std::fmt;

/// Key of an entry in the route cache.
///
/// Two key shapes exist: the full route list (`routes`) and a single route
/// stored under the request path it was resolved for (`route:<path>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full route list.
    Routes,
    /// A single route.
    Route(String),
}

impl CacheKey {
    /// Key of the full route list.
    pub fn routes() -> Self {
        Self::Routes
    }

    /// Key of the route resolved for request path `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint_resolver::cache::CacheKey;
    ///
    /// let key = CacheKey::route("/users/42");
    /// assert_eq!(key.to_string(), "route:/users/42");
    /// assert_eq!(key.kind(), "route");
    /// ```
    pub fn route(path: impl Into<String>) -> Self {
        Self::Route(path.into())
    }

    /// Metric label of the key shape: `routes` or `route`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Routes => "routes",
            Self::Route(_) => "route",
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Routes => write!(f, "routes"),
            Self::Route(path) => write!(f, "route:{}", path),
        }
    }
}
