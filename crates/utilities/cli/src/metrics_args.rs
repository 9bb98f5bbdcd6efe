//! Prometheus metrics CLI arguments.

use crate::{CliResult, init_prometheus_server};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Configuration for the Prometheus metrics endpoint.
#[derive(Parser, Clone, Debug, PartialEq, Eq)]
pub struct MetricsArgs {
    /// Serve Prometheus metrics over HTTP.
    #[arg(
        id = "metrics_enabled",
        long = "metrics.enabled",
        global = true,
        default_value_t = false,
        env = "BTCRELAY_METRICS_ENABLED"
    )]
    pub enabled: bool,

    /// Port the metrics server listens on.
    #[arg(
        id = "metrics_port",
        long = "metrics.port",
        global = true,
        default_value_t = 9090,
        env = "BTCRELAY_METRICS_PORT"
    )]
    pub port: u16,

    /// Address the metrics server binds to.
    #[arg(
        id = "metrics_addr",
        long = "metrics.addr",
        global = true,
        default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        env = "BTCRELAY_METRICS_ADDR"
    )]
    pub addr: IpAddr,
}

impl Default for MetricsArgs {
    fn default() -> Self {
        Self { enabled: false, port: 9090, addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED) }
    }
}

impl MetricsArgs {
    /// Starts the metrics server if enabled, returning the address it listens on.
    pub fn init_metrics(&self) -> CliResult<Option<SocketAddr>> {
        if !self.enabled {
            return Ok(None);
        }
        init_prometheus_server(self.addr, self.port).map(Some)
    }
}
