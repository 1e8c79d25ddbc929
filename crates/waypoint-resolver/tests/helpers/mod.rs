//! Test helpers for waypoint-resolver.

#![allow(dead_code, unused_imports)]

pub mod doubles;
pub mod fixtures;

pub use doubles::{CountingMatcher, CountingRepository, FailingCache, MapCache};
pub use fixtures::*;
