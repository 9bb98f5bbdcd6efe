//! Configuration for the relay.

use alloy_primitives::B256;
use btcrelay_primitives::BlockHeader;
use serde::{Deserialize, Serialize};

/// Default bound on the number of parent links followed by an ancestor walk.
///
/// Two retarget periods, far deeper than any confirmation depth a consumer asks for.
pub const DEFAULT_MAX_TRAVERSAL_DEPTH: usize = 4032;

/// Tunables for the chain tracker and relay service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RelayConfig {
    /// Maximum number of `prev_block` links an ancestor walk may follow before giving up.
    pub max_traversal_depth: usize,
    /// Minimum number of blocks that must be built on top of a block before transactions in
    /// it are relayed. Zero disables the check.
    pub min_confirmations: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { max_traversal_depth: DEFAULT_MAX_TRAVERSAL_DEPTH, min_confirmations: 0 }
    }
}

impl RelayConfig {
    /// Sets the maximum ancestor walk depth.
    pub const fn with_max_traversal_depth(mut self, depth: usize) -> Self {
        self.max_traversal_depth = depth;
        self
    }

    /// Sets the required confirmation depth.
    pub const fn with_min_confirmations(mut self, confirmations: u64) -> Self {
        self.min_confirmations = confirmations;
        self
    }
}

/// The trusted block the relay is bootstrapped from.
///
/// Ancestor resolution never goes below the anchor, and the anchor is always part of the
/// main chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    /// Hash of the anchor block.
    pub hash: B256,
    /// Header of the anchor block.
    pub header: BlockHeader,
    /// Absolute Bitcoin height of the anchor block.
    #[serde(default)]
    pub height: u64,
}

impl Anchor {
    /// Creates a new [`Anchor`].
    pub const fn new(hash: B256, header: BlockHeader, height: u64) -> Self {
        Self { hash, header, height }
    }
}
