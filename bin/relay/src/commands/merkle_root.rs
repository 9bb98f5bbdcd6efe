//! The `merkle-root` subcommand.

use alloy_primitives::B256;
use anyhow::{Context, Result, ensure};
use btcrelay_merkle::{MerkleProof, MerkleTree};
use clap::Parser;
use serde::Serialize;

/// Computes the merkle root of an ordered list of transaction hashes.
#[derive(Parser, Clone, Debug)]
pub struct MerkleRootCommand {
    /// Transaction hashes in block order.
    #[arg(long = "leaf", required = true, num_args = 1..)]
    pub leaves: Vec<B256>,
    /// Also print the inclusion proof for the leaf at this index.
    #[arg(long = "proof-index")]
    pub proof_index: Option<usize>,
}

#[derive(Debug, Serialize)]
struct RootWithProof {
    root: B256,
    index: usize,
    proof: MerkleProof,
}

impl MerkleRootCommand {
    /// Runs the subcommand, returning the text to print.
    pub fn run(&self) -> Result<String> {
        let tree =
            MerkleTree::from_leaves(self.leaves.clone()).context("At least one leaf is required")?;

        let Some(index) = self.proof_index else {
            return Ok(tree.root().to_string());
        };
        ensure!(
            index < tree.leaf_count(),
            "Proof index {index} out of range for {} leaves",
            tree.leaf_count()
        );
        let proof = tree.proof(index).context("Failed to build proof")?;
        Ok(serde_json::to_string_pretty(&RootWithProof { root: tree.root(), index, proof })?)
    }
}
