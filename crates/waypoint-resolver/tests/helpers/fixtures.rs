//! Route tables and service builders shared by the integration tests.

use std::sync::Arc;

use waypoint_core::Route;
use waypoint_resolver::RouteService;
use waypoint_resolver::cache::RouteCache;

use super::doubles::{CountingMatcher, CountingRepository, MapCache};

/// A small gateway table: users, orders and a static catch-all.
pub fn gateway_routes() -> Vec<Route> {
    vec![
        Route::new("/users/:id", "http://users.internal").with_methods(["GET", "PUT"]),
        Route::new("/orders", "http://orders.internal").with_methods(["GET", "POST"]),
        Route::new("/static/*", "http://assets.internal").with_methods(["GET"]),
    ]
}

/// Everything a test needs to observe a service from the outside.
pub struct Harness {
    pub service: RouteService,
    pub repository: Arc<CountingRepository>,
    pub cache: Arc<MapCache>,
    pub matcher: Arc<CountingMatcher>,
}

pub fn harness(routes: Vec<Route>) -> Harness {
    let repository = CountingRepository::with_routes(routes);
    let cache = MapCache::new();
    let matcher = CountingMatcher::new();

    let service = RouteService::new(repository.clone(), cache.clone()).with_matcher(matcher.clone());

    Harness {
        service,
        repository,
        cache,
        matcher,
    }
}

pub fn service_with_cache(routes: Vec<Route>, cache: Arc<dyn RouteCache>) -> (RouteService, Arc<CountingRepository>) {
    let repository = CountingRepository::with_routes(routes);
    let service = RouteService::new(repository.clone(), cache);
    (service, repository)
}
