//! Hash and header primitives shared by every btcrelay crate.
//!
//! Hashes are carried as [`B256`] in display order, the byte order block explorers and
//! `bitcoind` RPC print them in. Hashing and header decoding are delegated to the `bitcoin`
//! crate; [`hash`] converts to and from its types at the boundary.

#![doc(issue_tracker_base_url = "https://github.com/btcrelay/btcrelay-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub use alloy_primitives::{B256, b256};

pub mod hash;
pub use hash::{from_bitcoin, hash_nodes, to_bitcoin};

mod header;
pub use header::{BlockHeader, RAW_HEADER_LEN, RawHeader};

mod errors;
pub use errors::HeaderError;
