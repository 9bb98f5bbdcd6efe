use alloy_primitives::B256;
use thiserror::Error;

/// Errors that may occur while interacting with block header storage.
///
/// This enum is used across all implementations of the storage traits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// No header is stored under the requested hash.
    #[error("Entry not found: {0}")]
    EntryNotFound(B256),

    /// A writer panicked while holding the store lock.
    #[error("Block store lock poisoned")]
    LockPoisoned,
}
