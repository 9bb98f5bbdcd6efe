//! In-memory block header store.

use crate::{BlockStoreReader, BlockStoreWriter, StorageError};
use alloy_primitives::{B256, map::B256HashMap};
use btcrelay_primitives::BlockHeader;
use std::sync::RwLock;
use tracing::{error, trace};

/// A [`RwLock`] guarded hash map of block headers.
///
/// Every write replaces a single key under the write lock, so per-key writes are atomic.
#[derive(Debug, Default)]
pub struct InMemoryBlockStore {
    headers: RwLock<B256HashMap<BlockHeader>>,
}

impl InMemoryBlockStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockStoreReader for InMemoryBlockStore {
    fn get(&self, block_hash: B256) -> Result<BlockHeader, StorageError> {
        let headers = self.headers.read().map_err(|_| {
            error!(target: "block_store", %block_hash, "Failed to acquire read lock");
            StorageError::LockPoisoned
        })?;
        headers.get(&block_hash).copied().ok_or_else(|| {
            trace!(target: "block_store", %block_hash, "No header found");
            StorageError::EntryNotFound(block_hash)
        })
    }

    fn has(&self, block_hash: B256) -> Result<bool, StorageError> {
        let headers = self.headers.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(headers.contains_key(&block_hash))
    }

    fn len(&self) -> Result<usize, StorageError> {
        let headers = self.headers.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(headers.len())
    }
}

impl BlockStoreWriter for InMemoryBlockStore {
    fn put(&self, block_hash: B256, header: BlockHeader) -> Result<(), StorageError> {
        let mut headers = self.headers.write().map_err(|_| {
            error!(target: "block_store", %block_hash, "Failed to acquire write lock");
            StorageError::LockPoisoned
        })?;
        headers.insert(block_hash, header);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;

    fn header(prev: u8, root: u8) -> BlockHeader {
        BlockHeader::new(B256::repeat_byte(prev), B256::repeat_byte(root))
    }

    #[test]
    fn test_put_and_get() {
        let store = InMemoryBlockStore::new();
        let hash = B256::repeat_byte(1);

        assert!(store.is_empty().unwrap());
        store.put(hash, header(0, 9)).expect("put header");

        assert_eq!(store.get(hash).unwrap(), header(0, 9));
        assert!(store.has(hash).unwrap());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_get_missing_entry() {
        let store = InMemoryBlockStore::new();
        let hash = B256::repeat_byte(42);
        assert_eq!(store.get(hash), Err(StorageError::EntryNotFound(hash)));
        assert!(!store.has(hash).unwrap());
    }

    #[rstest]
    #[case::same_header(header(0, 1), header(0, 1))]
    #[case::different_header(header(0, 1), header(2, 3))]
    fn test_put_overwrites(#[case] first: BlockHeader, #[case] second: BlockHeader) {
        let store = InMemoryBlockStore::new();
        let hash = B256::repeat_byte(5);
        store.put(hash, first).unwrap();
        store.put(hash, second).unwrap();
        assert_eq!(store.get(hash).unwrap(), second);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_put_does_not_require_parent() {
        let store = InMemoryBlockStore::new();
        let orphan = B256::repeat_byte(3);
        store.put(orphan, header(0xee, 1)).unwrap();
        assert!(!store.has(B256::repeat_byte(0xee)).unwrap());
        assert!(store.has(orphan).unwrap());
    }

    #[test]
    fn test_shared_store_concurrent_writes() {
        let store = Arc::new(InMemoryBlockStore::new());
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.put(B256::repeat_byte(i), header(i, i)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        assert_eq!(store.len().unwrap(), 8);
        assert_eq!(store.get(B256::repeat_byte(4)).unwrap(), header(4, 4));
    }
}
