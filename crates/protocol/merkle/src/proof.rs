//! Merkle path replay.

use crate::{Direction, ProofError};
use btcrelay_primitives::{B256, hash_nodes};

/// One level of a merkle path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProofStep {
    /// The sibling hash at this level.
    pub sibling: B256,
    /// Which side the sibling sits on.
    pub direction: Direction,
}

impl ProofStep {
    /// Creates a new [`ProofStep`].
    pub const fn new(sibling: B256, direction: Direction) -> Self {
        Self { sibling, direction }
    }

    /// Combines the running hash with this step's sibling.
    pub fn apply(&self, running: &B256) -> B256 {
        match self.direction {
            Direction::Left => hash_nodes(&self.sibling, running),
            Direction::Right => hash_nodes(running, &self.sibling),
        }
    }
}

/// An ordered merkle path from a leaf up to the root.
///
/// An empty proof describes a block with a single transaction, whose merkle root is the
/// transaction hash itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MerkleProof {
    steps: Vec<ProofStep>,
}

impl MerkleProof {
    /// Creates a proof from already paired steps.
    pub const fn new(steps: Vec<ProofStep>) -> Self {
        Self { steps }
    }

    /// Assembles a proof from parallel sibling and direction sequences.
    ///
    /// Both sequences must be exactly `proof_len` long; a mismatch is rejected rather than
    /// truncated.
    pub fn from_parts(
        proof_len: usize,
        siblings: Vec<B256>,
        directions: Vec<Direction>,
    ) -> Result<Self, ProofError> {
        if siblings.len() != proof_len || directions.len() != proof_len {
            return Err(ProofError::LengthMismatch {
                expected: proof_len,
                siblings: siblings.len(),
                directions: directions.len(),
            });
        }

        let steps = siblings
            .into_iter()
            .zip(directions)
            .map(|(sibling, direction)| ProofStep::new(sibling, direction))
            .collect();
        Ok(Self { steps })
    }

    /// Returns the number of levels in the path.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the path has no levels.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the steps of the path, leaf side first.
    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    /// Replays the path starting from `leaf` and returns the resulting root.
    pub fn compute_root(&self, leaf: B256) -> B256 {
        self.steps.iter().fold(leaf, |running, step| step.apply(&running))
    }
}

impl FromIterator<ProofStep> for MerkleProof {
    fn from_iter<I: IntoIterator<Item = ProofStep>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Returns `true` if `proof` links `leaf` to `expected_root`.
pub fn verify(leaf: B256, proof: &MerkleProof, expected_root: B256) -> bool {
    proof.compute_root(leaf) == expected_root
}
