//! Waypoint route resolver binary.
//!
//! Usage: `waypoint [METHOD] <path>...`
//!
//! Resolves each path against the configured route file and prints the
//! matched route as JSON. When a METHOD is given, also reports whether the
//! route allows it.

use std::sync::Arc;

use anyhow::{Context, bail};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use waypoint_resolver::cache::MokaRouteCache;
use waypoint_resolver::metrics::init_metrics;
use waypoint_resolver::secrets::jwt_secret;
use waypoint_resolver::{RouteService, Settings};
use waypoint_store::MemoryRouteRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::load().context("failed to load settings")?;

    let prometheus = if settings.metrics.enabled {
        Some(init_metrics().context("failed to install metrics recorder")?)
    } else {
        None
    };

    tracing::info!("Starting Waypoint resolver v{}", env!("CARGO_PKG_VERSION"));

    let secret = jwt_secret(&settings.auth);
    tracing::info!(source = %secret.source(), "JWT secret resolved");

    let repository = match &settings.store.routes_file {
        Some(path) => MemoryRouteRepository::from_file(path)
            .with_context(|| format!("failed to load routes from {}", path.display()))?,
        None => {
            tracing::warn!("No store.routes_file configured, starting with an empty route table");
            MemoryRouteRepository::new()
        },
    };

    let cache = Arc::new(MokaRouteCache::new(settings.cache_config()));
    let service = RouteService::new(Arc::new(repository), cache.clone())
        .with_options(settings.resolver_options());

    let (method, paths) = parse_args(std::env::args().skip(1).collect())?;

    for path in &paths {
        match service.get_route_by_path(path).await {
            Ok(route) => {
                println!("{}", serde_json::to_string_pretty(route.as_ref())?);
                if let Some(method) = &method {
                    let allowed = service.is_method_allowed(path, method).await?;
                    println!("{} {} -> {}", method, path, if allowed { "allowed" } else { "denied" });
                }
            },
            Err(e) => println!("{}: {}", path, e),
        }
    }

    let stats = cache.metrics().stats();
    tracing::info!(
        route_hits = stats.route_hits,
        route_misses = stats.route_misses,
        list_hits = stats.list_hits,
        list_misses = stats.list_misses,
        repository_loads = service.metrics().repository_loads(),
        "Resolution finished"
    );

    if settings.metrics.render_on_exit
        && let Some(handle) = prometheus
    {
        println!("{}", handle.render());
    }

    Ok(())
}

/// Splits arguments into an optional leading HTTP method and request paths.
fn parse_args(mut args: Vec<String>) -> anyhow::Result<(Option<String>, Vec<String>)> {
    let method = match args.first() {
        Some(first) if is_method(first) => Some(args.remove(0)),
        _ => None,
    };

    if args.is_empty() {
        bail!("usage: waypoint [METHOD] <path>...");
    }
    Ok((method, args))
}

fn is_method(arg: &str) -> bool {
    !arg.is_empty() && !arg.starts_with('/') && arg.chars().all(|c| c.is_ascii_uppercase())
}
