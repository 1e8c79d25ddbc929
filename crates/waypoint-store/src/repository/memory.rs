//! In-memory route repository.

use std::path::Path;

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, info};
use waypoint_core::{RepositoryError, Route};

use crate::loader::RouteFileLoader;
use crate::repository::RouteRepository;

/// An ordered, thread-safe route store held in process memory.
///
/// Routes are kept in insertion order, which is the order the resolver scans
/// them in. Updating a route keeps its position.
#[derive(Debug, Default)]
pub struct MemoryRouteRepository {
    routes: RwLock<IndexMap<String, Route>>,
}

impl MemoryRouteRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding `routes` in the given order.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid or duplicated route.
    pub fn with_routes(routes: impl IntoIterator<Item = Route>) -> Result<Self, RepositoryError> {
        let repo = Self::new();
        {
            let mut guard = repo.routes.write();
            for route in routes {
                insert_new(&mut guard, route)?;
            }
        }
        Ok(repo)
    }

    /// Creates a repository seeded from a YAML or JSON routes file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let routes = RouteFileLoader::load(path)?;
        let repo = Self::with_routes(routes)?;

        info!(
            file = %path.display(),
            count = repo.len(),
            "Route repository seeded from file"
        );

        Ok(repo)
    }

    /// Returns the number of stored routes.
    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    /// Returns true if no route is stored.
    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }

    /// Returns a copy of the route registered under `path`.
    pub fn get(&self, path: &str) -> Option<Route> {
        self.routes.read().get(path).cloned()
    }
}

fn insert_new(routes: &mut IndexMap<String, Route>, route: Route) -> Result<(), RepositoryError> {
    route
        .validate()
        .map_err(|reason| RepositoryError::invalid_route(&route.path, reason))?;

    if routes.contains_key(&route.path) {
        return Err(RepositoryError::already_exists(&route.path));
    }

    routes.insert(route.path.clone(), route);
    Ok(())
}

#[async_trait]
impl RouteRepository for MemoryRouteRepository {
    async fn get_routes(&self) -> Result<Vec<Route>, RepositoryError> {
        Ok(self.routes.read().values().cloned().collect())
    }

    async fn add_route(&self, route: &Route) -> Result<(), RepositoryError> {
        insert_new(&mut self.routes.write(), route.clone())?;
        debug!(path = %route.path, "Route added");
        Ok(())
    }

    async fn update_route(&self, route: &Route) -> Result<(), RepositoryError> {
        route
            .validate()
            .map_err(|reason| RepositoryError::invalid_route(&route.path, reason))?;

        let mut routes = self.routes.write();
        let existing = routes
            .get_mut(&route.path)
            .ok_or_else(|| RepositoryError::not_found(&route.path))?;
        *existing = route.clone();

        debug!(path = %route.path, "Route updated");
        Ok(())
    }

    async fn delete_route(&self, path: &str) -> Result<(), RepositoryError> {
        self.routes
            .write()
            .shift_remove(path)
            .ok_or_else(|| RepositoryError::not_found(path))?;

        debug!(path = %path, "Route deleted");
        Ok(())
    }

    async fn update_metrics(
        &self,
        path: &str,
        call_count: i64,
        total_response_time: i64,
    ) -> Result<(), RepositoryError> {
        let mut routes = self.routes.write();
        let route = routes
            .get_mut(path)
            .ok_or_else(|| RepositoryError::not_found(path))?;

        route.call_count = route.call_count.saturating_add(call_count);
        route.total_response_time = route.total_response_time.saturating_add(total_response_time);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryRouteRepository {
        MemoryRouteRepository::with_routes([
            Route::new("/users/:id", "http://users").with_methods(["GET"]),
            Route::new("/orders", "http://orders").with_methods(["GET", "POST"]),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_routes_preserves_order() {
        let repo = sample();
        let paths: Vec<_> = repo
            .get_routes()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.path)
            .collect();

        assert_eq!(paths, vec!["/users/:id", "/orders"]);
    }

    #[tokio::test]
    async fn test_add_duplicate_fails() {
        let repo = sample();
        let err = repo
            .add_route(&Route::new("/orders", "http://other"))
            .await
            .unwrap_err();

        assert_eq!(err, RepositoryError::already_exists("/orders"));
    }

    #[tokio::test]
    async fn test_add_invalid_fails() {
        let repo = MemoryRouteRepository::new();
        let err = repo
            .add_route(&Route::new("orders", "http://orders"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::InvalidRoute { .. }));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_position() {
        let repo = sample();
        repo.update_route(&Route::new("/users/:id", "http://users-v2"))
            .await
            .unwrap();

        let routes = repo.get_routes().await.unwrap();
        assert_eq!(routes[0].path, "/users/:id");
        assert_eq!(routes[0].service_url, "http://users-v2");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = sample();
        let err = repo
            .update_route(&Route::new("/missing", "http://x"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = sample();
        repo.delete_route("/users/:id").await.unwrap();

        assert_eq!(repo.len(), 1);
        assert!(repo.get("/users/:id").is_none());
        assert!(repo.delete_route("/users/:id").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_metrics_accumulates() {
        let repo = sample();
        repo.update_metrics("/orders", 2, 40).await.unwrap();
        repo.update_metrics("/orders", 1, 20).await.unwrap();

        let route = repo.get("/orders").unwrap();
        assert_eq!(route.call_count, 3);
        assert_eq!(route.total_response_time, 60);
        assert_eq!(route.average_response_time(), Some(20.0));
    }

    #[tokio::test]
    async fn test_update_metrics_missing_route() {
        let repo = sample();
        assert!(
            repo.update_metrics("/missing", 1, 1)
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[test]
    fn test_with_routes_rejects_duplicates() {
        let result = MemoryRouteRepository::with_routes([
            Route::new("/a", "http://a"),
            Route::new("/a", "http://b"),
        ]);
        assert!(result.is_err());
    }
}
