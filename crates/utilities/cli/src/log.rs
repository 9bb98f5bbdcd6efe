//! Logging CLI arguments and tracing subscriber setup.

use crate::CliResult;
use clap::{ArgAction, Parser};
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Logging arguments shared by every subcommand.
#[derive(Parser, Default, Clone, Debug, PartialEq, Eq)]
pub struct LogArgs {
    /// Verbosity level: `-v` info, `-vv` debug, `-vvv` trace.
    #[arg(long = "verbose", short = 'v', global = true, action = ArgAction::Count)]
    pub verbosity: u8,
}

impl LogArgs {
    /// Installs the tracing subscriber for the configured verbosity.
    pub fn init_tracing(&self) -> CliResult<()> {
        init_tracing_subscriber(self.verbosity, None::<EnvFilter>)
    }
}

/// Maps a `-v` count to the default log level.
pub(crate) const fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global `tracing` subscriber.
///
/// Without an explicit filter, `RUST_LOG` directives apply on top of the level derived from
/// `verbosity`.
pub fn init_tracing_subscriber(
    verbosity: u8,
    env_filter: Option<impl Into<EnvFilter>>,
) -> CliResult<()> {
    let filter = match env_filter {
        Some(filter) => filter.into(),
        None => EnvFilter::builder()
            .with_default_directive(level_for(verbosity).into())
            .from_env_lossy(),
    };

    tracing_subscriber::registry().with(filter).with(fmt::layer()).try_init()?;
    Ok(())
}
