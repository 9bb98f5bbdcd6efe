//! Merkle inclusion proofs for Bitcoin transactions.
//!
//! A [`MerkleProof`] is the list of sibling hashes met on the way from a transaction up to the
//! block's merkle root, each tagged with the [`Direction`] the sibling sits on. [`verify`]
//! replays that path and compares the result against the root committed in the header.
//! [`MerkleTree`] builds proofs for a known transaction list.

#![doc(issue_tracker_base_url = "https://github.com/btcrelay/btcrelay-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod direction;
pub use direction::Direction;

mod proof;
pub use proof::{MerkleProof, ProofStep, verify};

mod tree;
pub use tree::MerkleTree;

mod errors;
pub use errors::ProofError;
