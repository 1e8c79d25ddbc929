//! # Waypoint Store
//!
//! Route persistence for the Waypoint gateway resolver.
//!
//! This crate defines the [`RouteRepository`] port the resolver loads and
//! mutates routes through, and ships an ordered in-memory implementation that
//! can be seeded from a YAML or JSON routes file.
//!
//! ## Example
//!
//! ```
//! use waypoint_core::Route;
//! use waypoint_store::{MemoryRouteRepository, RouteRepository};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let repo = MemoryRouteRepository::with_routes([
//!     Route::new("/users/:id", "http://users.internal").with_methods(["GET"]),
//! ])
//! .unwrap();
//!
//! let routes = repo.get_routes().await.unwrap();
//! assert_eq!(routes.len(), 1);
//! # }
//! ```

pub mod loader;
pub mod repository;

// Re-exports
pub use loader::{RouteFileFormat, RouteFileLoader};
pub use repository::{MemoryRouteRepository, RouteRepository};

// Re-export waypoint_core for consumers
pub use waypoint_core;
