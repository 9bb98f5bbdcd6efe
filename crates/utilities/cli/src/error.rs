//! Error types for CLI utilities.

use metrics_exporter_prometheus::BuildError;
use std::io;
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

/// Errors that can occur while setting up a binary's runtime.
#[derive(Error, Debug)]
pub enum CliError {
    /// Failed to reserve an address for the metrics server.
    #[error("Failed to bind metrics address: {0}")]
    MetricsBind(#[from] io::Error),

    /// Failed to install the Prometheus recorder and exporter.
    #[error("Failed to initialize metrics: {0}")]
    MetricsInitialization(#[from] BuildError),

    /// A global tracing subscriber was already installed.
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInitialization(#[from] TryInitError),
}

/// Type alias for CLI results.
pub type CliResult<T> = Result<T, CliError>;
