//! Global arguments for the CLI.

use btcrelay_cli::{CliResult, LogArgs, MetricsArgs};
use clap::Parser;

/// Global arguments for the CLI.
#[derive(Parser, Default, Clone, Debug)]
pub struct GlobalArgs {
    /// Logging arguments.
    #[command(flatten)]
    pub log_args: LogArgs,
    /// Prometheus CLI arguments.
    #[command(flatten)]
    pub metrics: MetricsArgs,
}

impl GlobalArgs {
    /// Installs the tracing subscriber and, when enabled, the metrics exporter.
    pub fn init_stack(&self) -> CliResult<()> {
        self.log_args.init_tracing()?;
        if self.metrics.init_metrics()?.is_some() {
            btcrelay_core::Metrics::init();
        }
        Ok(())
    }
}
