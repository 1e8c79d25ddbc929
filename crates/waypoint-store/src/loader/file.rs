//! Routes file parsing.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use waypoint_core::{RepositoryError, Route};

use super::RouteFileFormat;

/// A routes file is either a bare list or a document with a `routes` key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RouteDocument {
    Wrapped { routes: Vec<Route> },
    List(Vec<Route>),
}

impl RouteDocument {
    fn into_routes(self) -> Vec<Route> {
        match self {
            Self::Wrapped { routes } | Self::List(routes) => routes,
        }
    }
}

/// Reads route definitions from YAML or JSON.
///
/// ```yaml
/// routes:
///   - path: /users/:id
///     serviceURL: http://users.internal
///     methods: [GET, PUT]
/// ```
pub struct RouteFileLoader;

impl RouteFileLoader {
    /// Loads routes from a file, picking the format from its extension.
    pub fn load(path: &Path) -> Result<Vec<Route>, RepositoryError> {
        let source_name = path.display().to_string();

        let content = std::fs::read_to_string(path)
            .map_err(|e| RepositoryError::load(&source_name, e.to_string()))?;

        let format = RouteFileFormat::detect(path, &content).ok_or_else(|| {
            RepositoryError::load(&source_name, "unsupported routes file extension")
        })?;

        let routes = Self::parse(&content, format, &source_name)?;
        debug!(file = %source_name, format = %format, count = routes.len(), "Routes file parsed");

        Ok(routes)
    }

    /// Parses routes from an in-memory document.
    pub fn parse(
        content: &str,
        format: RouteFileFormat,
        source_name: &str,
    ) -> Result<Vec<Route>, RepositoryError> {
        let document: RouteDocument = format
            .decode(content)
            .map_err(|message| RepositoryError::load(source_name, message))?;

        Ok(document.into_routes())
    }
}
