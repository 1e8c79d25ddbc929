//! Metrics setup and initialization.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;
use tracing::info;

/// Failure installing the Prometheus recorder.
#[derive(Debug, Error)]
pub enum MetricsSetupError {
    #[error("failed to set histogram buckets: {0}")]
    Buckets(#[source] BuildError),

    #[error("failed to install metrics recorder: {0}")]
    Install(#[source] BuildError),
}

/// Installs the Prometheus recorder and returns the handle used to render it.
pub fn init_metrics() -> Result<PrometheusHandle, MetricsSetupError> {
    let handle = PrometheusBuilder::new()
        // Buckets in seconds, from 10 microseconds (cache hit) up to 1 second
        .set_buckets(&[
            0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25,
            0.5, 1.0,
        ])
        .map_err(MetricsSetupError::Buckets)?
        .install_recorder()
        .map_err(MetricsSetupError::Install)?;

    super::cache::register_cache_metrics();
    super::resolver::register_resolver_metrics();

    info!("Metrics system initialized");
    Ok(handle)
}
