//! Route resolution service.

mod coalesce;
mod options;
mod route_service;

pub use coalesce::ListLoadCoalescer;
pub use options::ResolverOptions;
pub use route_service::RouteService;
