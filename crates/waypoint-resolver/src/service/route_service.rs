//! Cache-aside route resolution.

use std::sync::Arc;
use std::time::Instant;

use tracing::{Span, debug, error, field, info, instrument, warn};
use waypoint_core::{PathMatcher, PatternMatcher, RepositoryError, Result, Route, RouteError};
use waypoint_store::RouteRepository;

use super::coalesce::ListLoadCoalescer;
use super::options::ResolverOptions;
use crate::cache::{CacheKey, CacheValue, ResolutionMemo, RouteCache, RouteList};
use crate::metrics::{LookupOutcome, ResolverMetrics};

/// Resolves request paths to registered routes.
///
/// Lookups go through three tiers: the individual-route cache, keyed by the
/// requested path, then the cached route list, and finally the repository.
/// Mutations are delegated to the repository and followed by best-effort
/// invalidation of the route list, the mutated route and every request path
/// resolved since the previous mutation.
///
/// Cache failures never reach the caller: a failed read is a miss, a failed
/// write or delete is logged. Repository failures are always returned as
/// [`RouteError::Repository`].
///
/// The service holds no locks around cache or repository calls and can be
/// shared behind an `Arc` by any number of tasks.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use waypoint_core::Route;
/// use waypoint_resolver::cache::{CacheConfig, MokaRouteCache};
/// use waypoint_resolver::service::RouteService;
/// use waypoint_store::MemoryRouteRepository;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repository = MemoryRouteRepository::with_routes([
///     Route::new("/users/:id", "http://users.internal").with_methods(["GET"]),
/// ])?;
/// let service = RouteService::new(
///     Arc::new(repository),
///     Arc::new(MokaRouteCache::new(CacheConfig::default())),
/// );
///
/// let route = service.get_route_by_path("/users/42").await?;
/// assert_eq!(route.service_url, "http://users.internal");
/// assert!(!service.is_method_allowed("/users/42", "DELETE").await?);
/// # Ok(())
/// # }
/// ```
pub struct RouteService {
    repository: Arc<dyn RouteRepository>,
    cache: Arc<dyn RouteCache>,
    matcher: Arc<dyn PathMatcher>,
    memo: ResolutionMemo,
    coalescer: Option<ListLoadCoalescer>,
    options: ResolverOptions,
    metrics: ResolverMetrics,
}

impl RouteService {
    /// Creates a service with the default pattern matcher and options.
    pub fn new(repository: Arc<dyn RouteRepository>, cache: Arc<dyn RouteCache>) -> Self {
        let options = ResolverOptions::default();
        Self {
            repository,
            cache,
            matcher: Arc::new(PatternMatcher),
            memo: ResolutionMemo::new(options.memo_capacity, options.ttl()),
            coalescer: None,
            options,
            metrics: ResolverMetrics::new(),
        }
    }

    /// Builder-style method to replace the path matcher.
    pub fn with_matcher(mut self, matcher: Arc<dyn PathMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Builder-style method to apply options.
    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.memo = ResolutionMemo::new(options.memo_capacity, options.ttl());
        self.coalescer = options.coalesce_list_loads.then(ListLoadCoalescer::new);
        self.options = options;
        self
    }

    /// Returns the active options.
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Returns the resolver metrics.
    pub fn metrics(&self) -> &ResolverMetrics {
        &self.metrics
    }

    /// Returns every registered route, from cache when possible.
    ///
    /// # Errors
    ///
    /// Only repository failures are returned.
    #[instrument(skip(self), fields(from_cache = field::Empty))]
    pub async fn get_routes(&self) -> Result<RouteList> {
        if let Some(routes) = self.cached_routes().await {
            Span::current().record("from_cache", true);
            return Ok(routes);
        }

        Span::current().record("from_cache", false);
        Ok(self.load_routes().await?)
    }

    /// Resolves a request path to the first route whose pattern matches it.
    ///
    /// # Errors
    ///
    /// - `RouteError::RouteNotFound` if no pattern matches after a full scan
    /// - `RouteError::Repository` if the route list had to be loaded and the
    ///   repository failed
    #[instrument(
        skip(self),
        fields(cache_hit = field::Empty, registered_path = field::Empty, routes_count = field::Empty)
    )]
    pub async fn get_route_by_path(&self, path: &str) -> Result<Arc<Route>> {
        let start = Instant::now();
        let result = self.resolve(path).await;

        let outcome = match &result {
            Ok((_, outcome)) => *outcome,
            Err(RouteError::RouteNotFound { .. }) => LookupOutcome::NotFound,
            Err(RouteError::Repository(_)) => LookupOutcome::Error,
        };
        self.metrics.record_lookup(outcome, start.elapsed());

        result.map(|(route, _)| route)
    }

    /// Clears the route list entry, the entry of every registered path and
    /// the entry of every request path resolved so far.
    ///
    /// # Errors
    ///
    /// Fails only if the repository cannot list the routes to sweep.
    #[instrument(skip(self))]
    pub async fn clear_cache(&self) -> Result<()> {
        self.invalidate(&CacheKey::routes()).await;

        let routes = self.repository.get_routes().await.inspect_err(|e| {
            error!(error = %e, "Failed to load routes for cache clearing");
        })?;

        for route in &routes {
            self.invalidate(&CacheKey::route(&route.path)).await;
        }
        self.sweep_resolved_paths().await;

        info!(count = routes.len(), "Route cache cleared");
        Ok(())
    }

    /// Registers a new route and drops the cached route list.
    ///
    /// Resolved paths are dropped too, since the new pattern may match them.
    #[instrument(skip(self, route), fields(path = %route.path))]
    pub async fn add_route(&self, route: &Route) -> Result<()> {
        self.repository.add_route(route).await?;

        self.invalidate(&CacheKey::routes()).await;
        self.sweep_resolved_paths().await;

        info!("Route added");
        Ok(())
    }

    /// Replaces a route and drops its cache entry and the cached route list.
    #[instrument(skip(self, route), fields(path = %route.path))]
    pub async fn update_route(&self, route: &Route) -> Result<()> {
        self.repository.update_route(route).await?;

        self.invalidate(&CacheKey::route(&route.path)).await;
        self.invalidate(&CacheKey::routes()).await;
        self.sweep_resolved_paths().await;

        info!("Route updated");
        Ok(())
    }

    /// Removes a route and drops its cache entry and the cached route list.
    #[instrument(skip(self))]
    pub async fn delete_route(&self, path: &str) -> Result<()> {
        self.repository.delete_route(path).await?;

        self.invalidate(&CacheKey::route(path)).await;
        self.invalidate(&CacheKey::routes()).await;
        self.sweep_resolved_paths().await;

        info!("Route deleted");
        Ok(())
    }

    /// Forwards call metrics to the repository.
    ///
    /// Cached routes keep the counters they were cached with.
    #[instrument(skip(self))]
    pub async fn update_metrics(
        &self,
        path: &str,
        call_count: i64,
        total_response_time: i64,
    ) -> Result<()> {
        self.repository
            .update_metrics(path, call_count, total_response_time)
            .await?;
        Ok(())
    }

    /// Reports whether `method` is allowed on the route resolved for `path`.
    ///
    /// A method missing from the route's set is `Ok(false)`. An empty set
    /// allows nothing unless `empty_methods_allow_all` is enabled.
    ///
    /// # Errors
    ///
    /// Lookup errors from [`get_route_by_path`](Self::get_route_by_path),
    /// unchanged.
    #[instrument(skip(self))]
    pub async fn is_method_allowed(&self, path: &str, method: &str) -> Result<bool> {
        let route = self.get_route_by_path(path).await?;

        if route.methods.is_empty() && self.options.empty_methods_allow_all {
            return Ok(true);
        }
        Ok(route.allows_method(method))
    }

    async fn resolve(&self, path: &str) -> Result<(Arc<Route>, LookupOutcome)> {
        let span = Span::current();

        if let Some(route) = self.cached_route(&CacheKey::route(path)).await {
            span.record("cache_hit", true);
            span.record("registered_path", route.path.as_str());
            debug!(
                path = %path,
                service_url = %route.service_url,
                "Route served from individual cache"
            );
            return Ok((route, LookupOutcome::CacheHit));
        }
        span.record("cache_hit", false);

        let routes = match self.cached_routes().await {
            Some(routes) => {
                debug!(routes_count = routes.len(), "Route list served from cache");
                routes
            },
            None => self.load_routes().await?,
        };
        span.record("routes_count", routes.len());

        let Some(route) = routes
            .iter()
            .find(|route| self.matcher.matches(&route.path, path))
        else {
            warn!(path = %path, "No route matches path");
            return Err(RouteError::not_found(path));
        };

        span.record("registered_path", route.path.as_str());
        info!(
            registered_path = %route.path,
            request_path = %path,
            service_url = %route.service_url,
            is_active = route.is_active,
            "Route matched by pattern"
        );

        self.store(CacheKey::route(path), CacheValue::Route(Arc::clone(route)))
            .await;
        self.memo.remember(path, &route.path).await;

        Ok((Arc::clone(route), LookupOutcome::PatternMatch))
    }

    /// Deletes the entry of every request path resolved since the last sweep.
    async fn sweep_resolved_paths(&self) {
        let resolved = self.memo.drain().await;
        for (path, pattern) in &resolved {
            debug!(path = %path, pattern = %pattern, "Dropping resolved path entry");
            self.invalidate(&CacheKey::route(path)).await;
        }
        if !resolved.is_empty() {
            debug!(count = resolved.len(), "Resolved path entries dropped");
        }
    }

    async fn cached_route(&self, key: &CacheKey) -> Option<Arc<Route>> {
        let value = self.cached(key).await?;
        let route = value.into_route();
        if route.is_none() {
            warn!(key = %key, "Cache returned a route list for a single-route key");
            self.metrics.record_cache_error("get");
        }
        route
    }

    async fn cached_routes(&self) -> Option<RouteList> {
        let key = CacheKey::routes();
        let value = self.cached(&key).await?;
        let routes = value.into_routes();
        if routes.is_none() {
            warn!(key = %key, "Cache returned a single route for the route list key");
            self.metrics.record_cache_error("get");
        }
        routes
    }

    async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        match self.cache.get(key).await {
            Ok(value) => value,
            Err(e) => {
                error!(key = %key, cache = self.cache.name(), error = %e, "Cache read failed, treating as miss");
                self.metrics.record_cache_error("get");
                None
            },
        }
    }

    async fn load_routes(&self) -> std::result::Result<RouteList, RepositoryError> {
        match &self.coalescer {
            Some(coalescer) => coalescer.load(|| self.fetch_routes()).await,
            None => self.fetch_routes().await,
        }
    }

    async fn fetch_routes(&self) -> std::result::Result<RouteList, RepositoryError> {
        info!(
            repository = self.repository.name(),
            "Route list not cached, loading from repository"
        );
        self.metrics.record_repository_load();

        let routes = self.repository.get_routes().await.inspect_err(|e| {
            error!(error = %e, "Failed to load routes from repository");
        })?;

        let routes: RouteList = Arc::new(routes.into_iter().map(Arc::new).collect());
        self.store(CacheKey::routes(), CacheValue::Routes(Arc::clone(&routes)))
            .await;

        Ok(routes)
    }

    async fn store(&self, key: CacheKey, value: CacheValue) {
        let key_name = key.to_string();
        if let Err(e) = self.cache.set(key, value, self.options.ttl()).await {
            warn!(key = %key_name, cache = self.cache.name(), error = %e, "Cache write failed");
            self.metrics.record_cache_error("set");
        }
    }

    async fn invalidate(&self, key: &CacheKey) {
        if let Err(e) = self.cache.delete(key).await {
            warn!(key = %key, cache = self.cache.name(), error = %e, "Cache invalidation failed");
            self.metrics.record_cache_error("delete");
        }
    }
}

impl std::fmt::Debug for RouteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteService")
            .field("repository", &self.repository.name())
            .field("cache", &self.cache.name())
            .field("matcher", &self.matcher)
            .field("options", &self.options)
            .finish()
    }
}
