//! Path pattern matching.
//!
//! The resolver treats matching as an opaque predicate through [`PathMatcher`].
//! [`PatternMatcher`] is the grammar shipped with Waypoint:
//!
//! | Pattern segment | Matches |
//! |-----------------|---------|
//! | `users`         | the literal segment `users` (case-sensitive) |
//! | `:id`, `{id}`   | exactly one non-empty segment |
//! | `*`             | exactly one segment; as the last segment, one or more |
//!
//! A trailing `/` is ignored on both sides, so `/users/` and `/users` are the
//! same path. The root path `/` only matches itself.

/// Decides whether a concrete request path satisfies a registered pattern.
pub trait PathMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if `path` matches `pattern`.
    fn matches(&self, pattern: &str, path: &str) -> bool;
}

/// Segment-based matcher supporting named parameters and wildcards.
///
/// # Example
///
/// ```
/// use waypoint_core::{PathMatcher, PatternMatcher};
///
/// let matcher = PatternMatcher;
/// assert!(matcher.matches("/users/:id", "/users/42"));
/// assert!(matcher.matches("/static/*", "/static/css/site.css"));
/// assert!(!matcher.matches("/users/:id", "/users/42/orders"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternMatcher;

impl PathMatcher for PatternMatcher {
    fn matches(&self, pattern: &str, path: &str) -> bool {
        let pattern_segments = segments(pattern);
        let path_segments = segments(path);

        for (index, expected) in pattern_segments.iter().enumerate() {
            let is_last = index == pattern_segments.len() - 1;

            if *expected == "*" && is_last {
                return path_segments.len() > index;
            }

            let Some(actual) = path_segments.get(index) else {
                return false;
            };

            if !segment_matches(expected, actual) {
                return false;
            }
        }

        pattern_segments.len() == path_segments.len()
    }
}

fn segment_matches(expected: &str, actual: &str) -> bool {
    if is_parameter(expected) || expected == "*" {
        return !actual.is_empty();
    }
    expected == actual
}

fn is_parameter(segment: &str) -> bool {
    (segment.len() > 1 && segment.starts_with(':'))
        || (segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}'))
}

fn segments(path: &str) -> Vec<&str> {
    let trimmed = path.trim_start_matches('/').trim_end_matches('/');
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').collect()
}
