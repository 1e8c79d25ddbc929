//! Route repository abstraction and the in-memory implementation.

mod memory;
mod traits;

pub use memory::MemoryRouteRepository;
pub use traits::RouteRepository;
