//! Relay tuning flags.

use btcrelay_core::RelayConfig;
use clap::Parser;

/// Overrides applied on top of the relay configuration found in a fixture.
#[derive(Parser, Default, Clone, Debug, PartialEq, Eq)]
pub struct RelayArgs {
    /// Maximum number of parent links followed when resolving main-chain membership.
    #[arg(long = "max-traversal-depth", env = "BTCRELAY_MAX_TRAVERSAL_DEPTH")]
    pub max_traversal_depth: Option<usize>,
    /// Minimum number of blocks required on top of a block before its transactions are
    /// relayed.
    #[arg(long = "min-confirmations", env = "BTCRELAY_MIN_CONFIRMATIONS")]
    pub min_confirmations: Option<u64>,
}

impl RelayArgs {
    /// Applies the overrides to `config`.
    pub fn apply(&self, mut config: RelayConfig) -> RelayConfig {
        if let Some(depth) = self.max_traversal_depth {
            config = config.with_max_traversal_depth(depth);
        }
        if let Some(confirmations) = self.min_confirmations {
            config = config.with_min_confirmations(confirmations);
        }
        config
    }
}
