//! Layered settings.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `config/waypoint.{yaml,toml,json}` (optional)
//! 3. Environment variables prefixed with `WAYPOINT__`, sections separated by
//!    `__` (e.g. `WAYPOINT__CACHE__TTL_SECONDS=60`)

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::cache::CacheConfig;
use crate::service::ResolverOptions;

/// Default location of the settings file, without extension.
pub const DEFAULT_SETTINGS_FILE: &str = "config/waypoint";

/// Cache section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Entry TTL in seconds (default: 300 = 5 minutes)
    pub ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10000)
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            max_capacity: 10_000,
        }
    }
}

/// Resolver section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    pub memo_capacity: u64,
    pub coalesce_list_loads: bool,
    pub empty_methods_allow_all: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        let options = ResolverOptions::default();
        Self {
            memo_capacity: options.memo_capacity,
            coalesce_list_loads: options.coalesce_list_loads,
            empty_methods_allow_all: options.empty_methods_allow_all,
        }
    }
}

/// Route store section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// YAML or JSON file the in-memory repository is seeded from.
    pub routes_file: Option<PathBuf>,
}

/// Metrics section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    /// Install the Prometheus recorder.
    pub enabled: bool,
    /// Print the Prometheus exposition when the binary exits.
    pub render_on_exit: bool,
}

/// Authentication section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// JWT signing secret. Environment variables take precedence.
    pub jwt_secret: Option<String>,
}

/// All settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cache: CacheSettings,
    pub resolver: ResolverSettings,
    pub store: StoreSettings,
    pub metrics: MetricsSettings,
    pub auth: AuthSettings,
}

impl Settings {
    /// Loads settings from the default file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_SETTINGS_FILE)
    }

    /// Loads settings from `file` (extension optional) and the environment.
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("WAYPOINT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Configuration for the Moka cache backend.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_capacity: self.cache.max_capacity,
        }
    }

    /// Options for the route service.
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            ttl_seconds: self.cache.ttl_seconds,
            memo_capacity: self.resolver.memo_capacity,
            coalesce_list_loads: self.resolver.coalesce_list_loads,
            empty_methods_allow_all: self.resolver.empty_methods_allow_all,
        }
    }
}
