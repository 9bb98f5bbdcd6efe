//! Storage for relayed Bitcoin block headers.
//!
//! The store maps a block hash to its [`BlockHeader`](btcrelay_primitives::BlockHeader) and
//! nothing else: linkage and fork choice live in `btcrelay-core`. Hosts that persist state
//! elsewhere implement [`BlockStoreReader`] and [`BlockStoreWriter`] themselves;
//! [`InMemoryBlockStore`] backs tests and the operator binary.

#![doc(issue_tracker_base_url = "https://github.com/btcrelay/btcrelay-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::StorageError;

mod traits;
pub use traits::{BlockStore, BlockStoreReader, BlockStoreWriter};

mod memory;
pub use memory::InMemoryBlockStore;
