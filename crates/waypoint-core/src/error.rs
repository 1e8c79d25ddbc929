//! Error types for Waypoint route resolution.
//!
//! The hierarchy mirrors the three collaborators the resolver talks to:
//!
//! - [`RouteError`] is what callers of the resolution service see. It is
//!   either a locally generated "not found" or a verbatim repository failure.
//! - [`RepositoryError`] is produced by route stores. It is always fatal to
//!   the operation that hit it.
//! - [`CacheError`] is produced by cache backends. The resolver never lets it
//!   escape: a failed read is treated as a miss and a failed write or delete
//!   is logged and ignored.
//!
//! # Example
//!
//! ```
//! use waypoint_core::{RepositoryError, RouteError};
//!
//! let err: RouteError = RepositoryError::unavailable("connection refused").into();
//! assert!(err.is_repository_error());
//! assert!(!err.is_not_found());
//! ```

use thiserror::Error;

/// Errors returned by the route resolution service.
#[derive(Debug, Clone, Error)]
pub enum RouteError {
    /// No registered pattern matched the requested path after a full scan.
    #[error("no route matches path '{path}'")]
    RouteNotFound {
        /// The requested path
        path: String,
    },

    /// The route repository failed. Propagated unmodified.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl RouteError {
    /// Creates a RouteNotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::RouteNotFound { path: path.into() }
    }

    /// Returns true if no route matched the requested path.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RouteNotFound { .. })
    }

    /// Returns true if this error came from the repository.
    pub fn is_repository_error(&self) -> bool {
        matches!(self, Self::Repository(_))
    }

    /// Returns the underlying repository error, if any.
    pub fn as_repository_error(&self) -> Option<&RepositoryError> {
        match self {
            Self::Repository(err) => Some(err),
            Self::RouteNotFound { .. } => None,
        }
    }
}

/// Errors that can occur when working with a route repository.
///
/// The type is `Clone` so a single failed load can be handed to every caller
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No route is registered under the given path.
    #[error("route not found: {0}")]
    NotFound(String),

    /// A route with the same path is already registered.
    #[error("route already exists: {0}")]
    AlreadyExists(String),

    /// The route failed validation.
    #[error("invalid route '{path}': {reason}")]
    InvalidRoute {
        /// Path of the offending route
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// The store is not reachable.
    #[error("repository unavailable: {reason}")]
    Unavailable {
        /// Description of the failure
        reason: String,
    },

    /// Loading routes from a seed file failed.
    #[error("failed to load routes from '{source_name}': {message}")]
    Load {
        /// File or location being loaded
        source_name: String,
        /// What went wrong
        message: String,
    },
}

impl RepositoryError {
    /// Creates a NotFound error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Creates an AlreadyExists error.
    pub fn already_exists(path: impl Into<String>) -> Self {
        Self::AlreadyExists(path.into())
    }

    /// Creates an InvalidRoute error.
    pub fn invalid_route(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRoute {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an Unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a Load error.
    pub fn load(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Returns true if the repository reported a missing route.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors raised by cache backends.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The cache backend cannot be reached.
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// A value could not be encoded or decoded.
    #[error("cache serialization failed for key '{key}': {message}")]
    Serialization {
        /// Key being read or written
        key: String,
        /// Description of the failure
        message: String,
    },

    /// Any other backend failure.
    #[error("cache backend error: {0}")]
    Backend(String),
}

impl CacheError {
    /// Creates an Unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// Creates a Backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Creates a Serialization error.
    pub fn serialization(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Type alias for Results with RouteError.
pub type Result<T> = std::result::Result<T, RouteError>;
