//! Block header types.

use crate::{HeaderError, from_bitcoin, to_bitcoin};
use alloy_primitives::B256;
use bitcoin::{
    CompactTarget,
    block::{Header, Version},
    consensus::{deserialize, serialize},
};

/// The length of a serialized Bitcoin block header.
pub const RAW_HEADER_LEN: usize = 80;

/// The parts of a Bitcoin block header the relay relies on.
///
/// Only the parent link and the merkle commitment are load-bearing; version, time, bits and
/// nonce are never validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BlockHeader {
    /// Hash of the parent block.
    pub prev_block: B256,
    /// Root of the block's transaction merkle tree.
    pub merkle_root: B256,
}

impl BlockHeader {
    /// Creates a new [`BlockHeader`].
    pub const fn new(prev_block: B256, merkle_root: B256) -> Self {
        Self { prev_block, merkle_root }
    }
}

/// A fully decoded 80-byte Bitcoin block header.
///
/// Wraps [`bitcoin::block::Header`] with both hashes exposed as display-order [`B256`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawHeader {
    /// Block version.
    pub version: i32,
    /// Hash of the parent block, display order.
    pub prev_block: B256,
    /// Merkle root, display order.
    pub merkle_root: B256,
    /// Block timestamp.
    pub time: u32,
    /// Compact difficulty target.
    pub bits: u32,
    /// Proof of work nonce.
    pub nonce: u32,
}

impl RawHeader {
    /// Decodes a header from its 80-byte serialization.
    pub fn decode(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() != RAW_HEADER_LEN {
            return Err(HeaderError::InvalidLength {
                expected: RAW_HEADER_LEN,
                actual: bytes.len(),
            });
        }

        let header: Header =
            deserialize(bytes).map_err(|err| HeaderError::Decode(err.to_string()))?;
        Ok(header.into())
    }

    /// Serializes the header into its 80-byte wire form.
    pub fn encode(&self) -> Vec<u8> {
        serialize(&self.to_bitcoin())
    }

    /// Returns the block hash, the double SHA-256 of the serialized header.
    pub fn hash(&self) -> B256 {
        from_bitcoin(self.to_bitcoin().block_hash())
    }

    /// Returns the relay's view of this header.
    pub const fn header(&self) -> BlockHeader {
        BlockHeader::new(self.prev_block, self.merkle_root)
    }

    /// Converts into the `bitcoin` crate's header type.
    pub fn to_bitcoin(&self) -> Header {
        Header {
            version: Version::from_consensus(self.version),
            prev_blockhash: to_bitcoin(&self.prev_block),
            merkle_root: to_bitcoin(&self.merkle_root),
            time: self.time,
            bits: CompactTarget::from_consensus(self.bits),
            nonce: self.nonce,
        }
    }
}

impl From<Header> for RawHeader {
    fn from(header: Header) -> Self {
        Self {
            version: header.version.to_consensus(),
            prev_block: from_bitcoin(header.prev_blockhash),
            merkle_root: from_bitcoin(header.merkle_root),
            time: header.time,
            bits: header.bits.to_consensus(),
            nonce: header.nonce,
        }
    }
}

impl TryFrom<&[u8]> for RawHeader {
    type Error = HeaderError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::decode(bytes)
    }
}

impl From<RawHeader> for BlockHeader {
    fn from(raw: RawHeader) -> Self {
        raw.header()
    }
}
