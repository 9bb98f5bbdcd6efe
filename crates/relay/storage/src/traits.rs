use crate::StorageError;
use alloy_primitives::B256;
use auto_impl::auto_impl;
use btcrelay_primitives::BlockHeader;

/// Provides read access to stored block headers.
///
/// Implementations are expected to provide thread-safe access to block data.
#[auto_impl(&, Arc)]
pub trait BlockStoreReader {
    /// Gets the [`BlockHeader`] stored under `block_hash`.
    ///
    /// # Returns
    /// * `Ok(BlockHeader)` if the header exists.
    /// * `Err(StorageError::EntryNotFound)` if nothing is stored under the hash.
    fn get(&self, block_hash: B256) -> Result<BlockHeader, StorageError>;

    /// Returns `true` if a header is stored under `block_hash`.
    fn has(&self, block_hash: B256) -> Result<bool, StorageError>;

    /// Returns the number of stored headers.
    fn len(&self) -> Result<usize, StorageError>;

    /// Returns `true` if the store holds no headers.
    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

/// Provides write access to block headers.
#[auto_impl(&, Arc)]
pub trait BlockStoreWriter {
    /// Inserts or overwrites the header stored under `block_hash`.
    ///
    /// The parent link is not validated; that is the caller's policy.
    fn put(&self, block_hash: B256, header: BlockHeader) -> Result<(), StorageError>;
}

/// Combines [`BlockStoreReader`] and [`BlockStoreWriter`].
pub trait BlockStore: BlockStoreReader + BlockStoreWriter {}

impl<T: BlockStoreReader + BlockStoreWriter> BlockStore for T {}
