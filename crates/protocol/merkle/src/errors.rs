use thiserror::Error;

/// Errors raised while assembling a [`crate::MerkleProof`] or parsing its directions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// The sibling and direction sequences disagree with the declared proof length.
    #[error(
        "Proof length mismatch: expected {expected} steps, got {siblings} siblings and {directions} directions"
    )]
    LengthMismatch {
        /// The declared proof length.
        expected: usize,
        /// Number of sibling hashes supplied.
        siblings: usize,
        /// Number of directions supplied.
        directions: usize,
    },
    /// A direction string was neither `left`/`l` nor `right`/`r`.
    #[error("Unknown proof direction: {0:?}")]
    UnknownDirection(String),
}
