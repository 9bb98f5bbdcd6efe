//! Subcommands for the btcrelay binary.

mod verify;
pub use verify::{VerifyCommand, VerifyReport};

mod merkle_root;
pub use merkle_root::MerkleRootCommand;
