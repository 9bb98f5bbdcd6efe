#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/btcrelay/btcrelay-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::{CliError, CliResult};

pub mod backtrace;

mod styles;
pub use styles::cli_styles;

mod prometheus;
pub use prometheus::init_prometheus_server;

pub mod log;
pub use log::{LogArgs, init_tracing_subscriber};

pub mod metrics_args;
pub use metrics_args::MetricsArgs;
