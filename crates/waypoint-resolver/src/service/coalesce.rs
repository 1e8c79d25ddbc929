//! Coalescing of concurrent route list loads.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;
use waypoint_core::RepositoryError;

use crate::cache::RouteList;

type SharedLoad = Arc<OnceCell<Result<RouteList, RepositoryError>>>;

/// Lets at most one route list load run at a time.
///
/// Callers arriving while a load is in flight wait for it and receive its
/// result, success or failure. Once the load finishes the slot is released,
/// so the next miss starts a fresh load. If the caller driving the load is
/// cancelled, one of the waiters takes over.
#[derive(Debug, Default)]
pub struct ListLoadCoalescer {
    in_flight: Mutex<Option<SharedLoad>>,
}

impl ListLoadCoalescer {
    /// Creates a coalescer with no load in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `fetch` unless a load is already in flight, in which case its
    /// result is shared.
    pub async fn load<F, Fut>(&self, fetch: F) -> Result<RouteList, RepositoryError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RouteList, RepositoryError>>,
    {
        let cell = {
            let mut slot = self.in_flight.lock();
            Arc::clone(slot.get_or_insert_with(|| Arc::new(OnceCell::new())))
        };

        let result = cell.get_or_init(fetch).await.clone();

        let mut slot = self.in_flight.lock();
        if slot.as_ref().is_some_and(|current| Arc::ptr_eq(current, &cell)) {
            *slot = None;
        }

        result
    }
}
