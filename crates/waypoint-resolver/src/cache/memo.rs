//! Record of resolved request paths.
//!
//! A pattern match is cached under the concrete request path
//! (`route:/users/42`), so a single registered pattern can own many cache
//! entries. The memo remembers which request paths were written and the
//! pattern each one resolved to. On every route mutation the service drains
//! it and deletes the matching entries.
//!
//! The memo is bounded. A path pushed out by capacity keeps its cache entry
//! until that entry's TTL runs out.

use std::time::Duration;

use moka::future::Cache;

/// Bounded in-process map of request path to registered pattern.
#[derive(Clone)]
pub struct ResolutionMemo {
    inner: Cache<String, String>,
}

impl ResolutionMemo {
    /// Creates a memo holding at most `capacity` paths for `ttl` each.
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Records that a route entry was written for `path`, matched by `pattern`.
    pub async fn remember(&self, path: &str, pattern: &str) {
        self.inner.insert(path.to_string(), pattern.to_string()).await;
    }

    /// Removes and returns every recorded `(path, pattern)` pair.
    ///
    /// Paths first recorded after the snapshot is taken are kept for the next
    /// drain.
    pub async fn drain(&self) -> Vec<(String, String)> {
        let entries: Vec<(String, String)> = self
            .inner
            .iter()
            .map(|(path, pattern)| (String::clone(&path), pattern))
            .collect();

        for (path, _) in &entries {
            self.inner.invalidate(path).await;
        }
        entries
    }
}

impl std::fmt::Debug for ResolutionMemo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionMemo")
            .field("len", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_drain_returns_recorded_paths() {
        let memo = ResolutionMemo::new(100, Duration::from_secs(60));
        memo.remember("/users/1", "/users/:id").await;
        memo.remember("/static/app.js", "/static/*").await;

        let mut drained = memo.drain().await;
        drained.sort();

        assert_eq!(
            drained,
            vec![
                ("/static/app.js".to_string(), "/static/*".to_string()),
                ("/users/1".to_string(), "/users/:id".to_string()),
            ]
        );
        assert!(memo.drain().await.is_empty());
    }

    #[tokio::test]
    async fn test_remember_overwrites_pattern() {
        let memo = ResolutionMemo::new(100, Duration::from_secs(60));
        memo.remember("/a/b", "/a/*").await;
        memo.remember("/a/b", "/a/b").await;

        assert_eq!(memo.drain().await, vec![("/a/b".to_string(), "/a/b".to_string())]);
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let memo = ResolutionMemo::new(100, Duration::from_millis(50));
        memo.remember("/users/1", "/users/:id").await;

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(memo.drain().await.is_empty());
    }
}
