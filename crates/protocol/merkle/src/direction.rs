//! Sibling position within a merkle proof step.

use crate::ProofError;
use derive_more::Display;

/// The side a sibling hash occupies when it is combined with the running hash.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Direction {
    /// The sibling is the left child: `parent = H(sibling, running)`.
    #[display("left")]
    Left,
    /// The sibling is the right child: `parent = H(running, sibling)`.
    #[display("right")]
    Right,
}

impl Direction {
    /// Returns the opposite side.
    pub const fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl TryFrom<&str> for Direction {
    type Error = ProofError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            other => Err(ProofError::UnknownDirection(other.to_string())),
        }
    }
}
