use alloy_primitives::B256;
use btcrelay_merkle::ProofError;
use btcrelay_primitives::HeaderError;
use btcrelay_storage::StorageError;
use thiserror::Error;

/// Errors that may occur while tracking the header chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// Represents an error that occurred while interacting with the storage layer.
    #[error(transparent)]
    StorageError(#[from] StorageError),

    /// An ancestor walk followed more parent links than the configured bound allows.
    #[error("Ancestor walk exceeded the traversal limit of {limit} blocks")]
    TraversalLimitExceeded {
        /// The configured bound.
        limit: usize,
    },

    /// A writer panicked while holding the chain state lock.
    #[error("Chain state lock poisoned")]
    LockPoisoned,
}

/// Errors returned by the public relay operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// The referenced block has never been submitted.
    #[error("Unknown block: {0}")]
    UnknownBlock(B256),

    /// The referenced block is stored but not part of the heaviest chain.
    #[error("Block {0} is not on the main chain")]
    NotOnMainChain(B256),

    /// The block does not yet have enough blocks built on top of it.
    #[error("Block {block} has {actual} confirmations, {required} required")]
    InsufficientConfirmations {
        /// The block the transaction was relayed against.
        block: B256,
        /// The configured minimum.
        required: u64,
        /// Confirmations the block currently has.
        actual: u64,
    },

    /// The proof sequences are inconsistent with the declared proof length.
    #[error(transparent)]
    MalformedProof(#[from] ProofError),

    /// The submitted header is structurally invalid.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// Represents an error raised by the chain tracker.
    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl From<HeaderError> for RelayError {
    fn from(err: HeaderError) -> Self {
        Self::MalformedHeader(err.to_string())
    }
}

impl From<StorageError> for RelayError {
    fn from(err: StorageError) -> Self {
        Self::Chain(err.into())
    }
}
