//! Route repository trait definition.

use async_trait::async_trait;
use waypoint_core::{RepositoryError, Route};

/// The authoritative store of gateway routes.
///
/// This trait abstracts over persistence engines (in-memory, SQL, key/value)
/// so the resolver can load and mutate routes without knowing the storage.
/// Every method may block on I/O; the resolver treats any error as fatal to
/// the operation that triggered it.
///
/// # Implementors
///
/// - `MemoryRouteRepository` - Ordered in-process store, optionally seeded
///   from a YAML or JSON routes file
///
/// # Example
///
/// ```ignore
/// use waypoint_store::RouteRepository;
///
/// struct SqlRoutes { /* pool */ }
///
/// #[async_trait]
/// impl RouteRepository for SqlRoutes {
///     async fn get_routes(&self) -> Result<Vec<Route>, RepositoryError> {
///         // SELECT ... ORDER BY position
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Returns every registered route.
    ///
    /// The order of the returned list is significant: the resolver scans it
    /// front to back and the first matching pattern wins.
    async fn get_routes(&self) -> Result<Vec<Route>, RepositoryError>;

    /// Registers a new route.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::AlreadyExists` if a route with the same path exists
    /// - `RepositoryError::InvalidRoute` if the route fails validation
    async fn add_route(&self, route: &Route) -> Result<(), RepositoryError>;

    /// Replaces the route registered under `route.path`.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if no route has that path
    async fn update_route(&self, route: &Route) -> Result<(), RepositoryError>;

    /// Removes the route registered under `path`.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if no route has that path
    async fn delete_route(&self, path: &str) -> Result<(), RepositoryError>;

    /// Adds the given call count and response time to a route's counters.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if no route has that path
    async fn update_metrics(
        &self,
        path: &str,
        call_count: i64,
        total_response_time: i64,
    ) -> Result<(), RepositoryError>;

    /// Returns the name of this repository, for logging.
    fn name(&self) -> &str;
}
