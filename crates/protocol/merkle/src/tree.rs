//! Bitcoin transaction merkle tree construction.

use crate::{Direction, MerkleProof, ProofStep};
use btcrelay_primitives::{B256, hash_nodes};

/// A fully materialized Bitcoin merkle tree.
///
/// Levels with an odd number of nodes pair their last node with itself, as Bitcoin does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    /// `levels[0]` holds the leaves, the last level holds the root.
    levels: Vec<Vec<B256>>,
}

impl MerkleTree {
    /// Builds the tree over `leaves` in block order. Returns `None` for an empty leaf set.
    pub fn from_leaves(leaves: Vec<B256>) -> Option<Self> {
        if leaves.is_empty() {
            return None;
        }

        let mut levels = vec![leaves];
        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let next = level
                .chunks(2)
                .map(|pair| {
                    let left = &pair[0];
                    hash_nodes(left, pair.get(1).unwrap_or(left))
                })
                .collect();
            levels.push(next);
        }

        Some(Self { levels })
    }

    /// Returns the merkle root.
    pub fn root(&self) -> B256 {
        self.levels.last().and_then(|level| level.first()).copied().unwrap_or_default()
    }

    /// Returns the number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Returns the depth of the tree, which is the length of every proof it produces.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Builds the inclusion proof for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Option<MerkleProof> {
        if index >= self.leaf_count() {
            return None;
        }

        let mut position = index;
        let steps = self.levels[..self.depth()]
            .iter()
            .map(|level| {
                let step = if position % 2 == 0 {
                    // A missing right neighbour means the node was paired with itself.
                    let sibling = level.get(position + 1).unwrap_or(&level[position]);
                    ProofStep::new(*sibling, Direction::Right)
                } else {
                    ProofStep::new(level[position - 1], Direction::Left)
                };
                position /= 2;
                step
            })
            .collect();

        Some(MerkleProof::new(steps))
    }
}
