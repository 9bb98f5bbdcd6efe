//! Utilities for spinning up a prometheus metrics server.

use crate::CliResult;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{IpAddr, SocketAddr, TcpListener};
use tracing::info;

/// Installs the global Prometheus recorder and serves it over HTTP.
///
/// A port of `0` lets the OS pick one. Returns the address metrics are served at.
pub fn init_prometheus_server(addr: IpAddr, metrics_port: u16) -> CliResult<SocketAddr> {
    let actual_addr = if metrics_port == 0 {
        // Bind first to learn the OS-assigned port, then hand it to the exporter.
        let listener = TcpListener::bind((addr, 0))?;
        listener.local_addr()?
    } else {
        SocketAddr::from((addr, metrics_port))
    };

    PrometheusBuilder::new().with_http_listener(actual_addr).install()?;

    info!(
        target: "prometheus",
        "Serving metrics at: http://{}",
        actual_addr
    );

    Ok(actual_addr)
}
