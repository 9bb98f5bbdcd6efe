//! Conversions between display-order [`B256`] values and `bitcoin` hash types.

use alloy_primitives::B256;
use bitcoin::hashes::{Hash, sha256d};

/// Converts a display-order hash into any 32-byte `bitcoin` hash type.
pub fn to_bitcoin<H: Hash<Bytes = [u8; 32]>>(hash: &B256) -> H {
    let mut bytes = hash.0;
    bytes.reverse();
    H::from_byte_array(bytes)
}

/// Converts a 32-byte `bitcoin` hash into a display-order [`B256`].
pub fn from_bitcoin<H: Hash<Bytes = [u8; 32]>>(hash: H) -> B256 {
    let mut bytes = hash.to_byte_array();
    bytes.reverse();
    B256::from(bytes)
}

/// Hashes two merkle tree children into their parent node.
///
/// The children are concatenated `left || right` in internal order, so the result is
/// sensitive to argument order.
pub fn hash_nodes(left: &B256, right: &B256) -> B256 {
    let left: sha256d::Hash = to_bitcoin(left);
    let right: sha256d::Hash = to_bitcoin(right);

    let mut concat = [0u8; 64];
    concat[..32].copy_from_slice(left.as_byte_array());
    concat[32..].copy_from_slice(right.as_byte_array());
    from_bitcoin(sha256d::Hash::hash(&concat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{b256, hex};
    use bitcoin::BlockHash;

    #[test]
    fn test_bitcoin_round_trip_keeps_display_order() {
        let hash = b256!("0x000000000003ba27aa200b1cecaad478d2b00432346c3f1f3986da1afd33e506");
        let block_hash: BlockHash = to_bitcoin(&hash);

        assert_eq!(block_hash.to_string(), hex::encode(hash));
        assert_eq!(block_hash.as_byte_array()[0], 0x06);
        assert_eq!(from_bitcoin(block_hash), hash);
    }

    #[test]
    fn test_hash_nodes_block_100000() {
        // The two right-most transactions of block 100000.
        let left = b256!("0x6359f0868171b1d194cbee1af2f16ea598ae8fad666d9b012c8ed2b79a236ec4");
        let right = b256!("0xe9a66845e05d5abc0ad04ec80f774a7e585c6e8db975962d069a522137b80c1d");
        assert_eq!(
            hash_nodes(&left, &right),
            b256!("0x8e30899078ca1813be036a073bbf80b86cdddde1c96e9e9c99e9e3782df4ae49")
        );
    }

    #[test]
    fn test_hash_nodes_is_order_sensitive() {
        let a = B256::repeat_byte(0x11);
        let b = B256::repeat_byte(0x22);
        assert_ne!(hash_nodes(&a, &b), hash_nodes(&b, &a));
    }
}
