//! Routes file formats.

use std::path::Path;

use serde::de::DeserializeOwned;

/// Encoding of a routes seed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteFileFormat {
    Yaml,
    Json,
}

impl RouteFileFormat {
    /// Picks the format of a routes file.
    ///
    /// A `.yml`, `.yaml` or `.json` extension decides. A file without an
    /// extension is sniffed: a document opening with `{` or `[` is JSON,
    /// anything else YAML. Any other extension is rejected with `None`.
    pub fn detect(path: &Path, content: &str) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml") => {
                Some(Self::Yaml)
            },
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(Self::Json),
            Some(_) => None,
            None => Some(Self::sniff(content)),
        }
    }

    fn sniff(content: &str) -> Self {
        match content.trim_start().chars().next() {
            Some('{' | '[') => Self::Json,
            _ => Self::Yaml,
        }
    }

    /// Deserializes `content` in this format.
    pub fn decode<T: DeserializeOwned>(self, content: &str) -> Result<T, String> {
        match self {
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

impl std::fmt::Display for RouteFileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        })
    }
}
