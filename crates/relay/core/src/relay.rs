//! The relay service: header submission and transaction inclusion relay.

use crate::{Anchor, ChainTracker, Membership, RecordOutcome, RelayConfig, RelayError};
use alloy_primitives::B256;
use btcrelay_merkle::{Direction, MerkleProof};
use btcrelay_primitives::{BlockHeader, RawHeader};
use btcrelay_storage::{BlockStore, StorageError};
use tracing::{debug, info};

/// Receives the outcome of every successful [`RelayService::relay_tx`] call.
///
/// Implemented for any `Fn(bool)`, so a closure is usually enough.
pub trait VerificationConsumer {
    /// Called exactly once with the verification result.
    fn on_verified(&self, verified: bool);
}

impl<F> VerificationConsumer for F
where
    F: Fn(bool),
{
    fn on_verified(&self, verified: bool) {
        self(verified)
    }
}

/// Public entry point of the relay.
///
/// Accepts block headers, maintains the heaviest chain through a [`ChainTracker`] and checks
/// transaction inclusion proofs against blocks on that chain.
#[derive(Debug)]
pub struct RelayService<S> {
    chain: ChainTracker<S>,
}

impl<S> RelayService<S>
where
    S: BlockStore,
{
    /// Creates a relay bootstrapped from `anchor`.
    pub fn new(store: S, anchor: Anchor, config: RelayConfig) -> Result<Self, RelayError> {
        Ok(Self { chain: ChainTracker::new(store, anchor, config)? })
    }

    /// Wraps an existing tracker.
    pub const fn from_tracker(chain: ChainTracker<S>) -> Self {
        Self { chain }
    }

    /// Returns the underlying chain tracker.
    pub const fn chain(&self) -> &ChainTracker<S> {
        &self.chain
    }

    /// Submits a header whose hash the caller has already computed.
    ///
    /// The hash is trusted as given. Resubmitting a known hash is a no-op, and a header that
    /// loses fork choice is still accepted.
    pub fn submit_header(
        &self,
        block_hash: B256,
        prev_block: B256,
        merkle_root: B256,
    ) -> Result<(), RelayError> {
        self.submit(block_hash, BlockHeader::new(prev_block, merkle_root)).map(|_| ())
    }

    /// Decodes a serialized 80-byte header, hashes it and submits it.
    ///
    /// Returns the computed block hash.
    pub fn submit_raw_header(&self, raw: &[u8]) -> Result<B256, RelayError> {
        let raw = RawHeader::decode(raw)?;
        let block_hash = raw.hash();
        self.submit(block_hash, raw.header())?;
        Ok(block_hash)
    }

    /// Submits a header and reports how fork choice treated it.
    pub fn submit(
        &self,
        block_hash: B256,
        header: BlockHeader,
    ) -> Result<RecordOutcome, RelayError> {
        if block_hash.is_zero() {
            return Err(RelayError::MalformedHeader("block hash is zero".to_string()));
        }
        if header.prev_block == block_hash {
            return Err(RelayError::MalformedHeader(format!(
                "block {block_hash} references itself as parent"
            )));
        }

        let outcome = self.chain.record_header(block_hash, header)?;
        debug!(target: "relay", %block_hash, ?outcome, "Submitted header");
        Ok(outcome)
    }

    /// Verifies that `tx_hash` is included in `block_hash` and that the block is on the main
    /// chain, then reports the result to `consumer`.
    ///
    /// The consumer is invoked exactly once when verification completes, and never when an
    /// error is returned. A proof that does not reproduce the block's merkle root yields
    /// `Ok(false)`.
    pub fn relay_tx<C>(
        &self,
        tx_hash: B256,
        proof_len: usize,
        siblings: Vec<B256>,
        directions: Vec<Direction>,
        block_hash: B256,
        consumer: &C,
    ) -> Result<bool, RelayError>
    where
        C: VerificationConsumer + ?Sized,
    {
        let result = self.check_inclusion(tx_hash, proof_len, siblings, directions, block_hash);
        #[cfg(feature = "metrics")]
        crate::Metrics::record_relay(&result);

        let verified = result?;
        info!(target: "relay", %tx_hash, %block_hash, verified, "Relayed transaction");
        consumer.on_verified(verified);
        Ok(verified)
    }

    /// Same checks as [`Self::relay_tx`] without notifying a consumer.
    pub fn verify_tx(
        &self,
        tx_hash: B256,
        proof: &MerkleProof,
        block_hash: B256,
    ) -> Result<bool, RelayError> {
        let header = self.main_chain_header(block_hash)?;
        Ok(btcrelay_merkle::verify(tx_hash, proof, header.merkle_root))
    }

    /// Returns the stored header for `block_hash`.
    pub fn header(&self, block_hash: B256) -> Result<BlockHeader, RelayError> {
        match self.chain.store().get(block_hash) {
            Ok(header) => Ok(header),
            Err(StorageError::EntryNotFound(_)) => Err(RelayError::UnknownBlock(block_hash)),
            Err(err) => Err(err.into()),
        }
    }

    /// Returns the current heaviest block hash.
    pub fn heaviest_block(&self) -> Result<B256, RelayError> {
        Ok(self.chain.heaviest_block()?)
    }

    /// Returns the absolute height of the heaviest block.
    pub fn chain_height(&self) -> Result<u64, RelayError> {
        Ok(self.chain.chain_height()?)
    }

    /// Returns `true` iff `block_hash` is on the heaviest chain.
    pub fn is_on_main_chain(&self, block_hash: B256) -> bool {
        self.chain.is_on_heaviest_chain(block_hash)
    }

    fn check_inclusion(
        &self,
        tx_hash: B256,
        proof_len: usize,
        siblings: Vec<B256>,
        directions: Vec<Direction>,
        block_hash: B256,
    ) -> Result<bool, RelayError> {
        let header = self.main_chain_header(block_hash)?;
        let proof = MerkleProof::from_parts(proof_len, siblings, directions)?;
        let verified = btcrelay_merkle::verify(tx_hash, &proof, header.merkle_root);
        debug!(
            target: "relay",
            %tx_hash,
            %block_hash,
            depth = proof.len(),
            verified,
            "Checked merkle proof"
        );
        Ok(verified)
    }

    fn main_chain_header(&self, block_hash: B256) -> Result<BlockHeader, RelayError> {
        let (header, confirmations) = match self.chain.membership(block_hash)? {
            Membership::Unknown => return Err(RelayError::UnknownBlock(block_hash)),
            Membership::OffMainChain => return Err(RelayError::NotOnMainChain(block_hash)),
            Membership::OnMainChain { header, confirmations } => (header, confirmations),
        };

        let required = self.chain.config().min_confirmations;
        if confirmations < required {
            return Err(RelayError::InsufficientConfirmations {
                block: block_hash,
                required,
                actual: confirmations,
            });
        }
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btcrelay_merkle::{MerkleTree, ProofError};
    use btcrelay_storage::InMemoryBlockStore;
    use rstest::rstest;
    use std::cell::RefCell;

    const ANCHOR: B256 = B256::repeat_byte(0xa0);

    #[derive(Debug, Default)]
    struct Recorder(RefCell<Vec<bool>>);

    impl VerificationConsumer for Recorder {
        fn on_verified(&self, verified: bool) {
            self.0.borrow_mut().push(verified);
        }
    }

    fn leaves() -> Vec<B256> {
        (1..=5u8).map(B256::repeat_byte).collect()
    }

    /// Relay with a block carrying [`leaves`] on top of the anchor, buried under `depth` blocks.
    fn relay(config: RelayConfig, depth: u8) -> (RelayService<InMemoryBlockStore>, B256) {
        let anchor = Anchor::new(ANCHOR, BlockHeader::default(), 0);
        let relay = RelayService::new(InMemoryBlockStore::new(), anchor, config).unwrap();

        let root = MerkleTree::from_leaves(leaves()).unwrap().root();
        let block = B256::repeat_byte(0xb0);
        relay.submit_header(block, ANCHOR, root).unwrap();

        let mut prev = block;
        for i in 0..depth {
            let next = B256::repeat_byte(0xc0 + i);
            relay.submit_header(next, prev, B256::ZERO).unwrap();
            prev = next;
        }
        (relay, block)
    }

    fn proof_parts(index: usize) -> (usize, Vec<B256>, Vec<Direction>) {
        let proof = MerkleTree::from_leaves(leaves()).unwrap().proof(index).unwrap();
        let (siblings, directions) =
            proof.steps().iter().map(|step| (step.sibling, step.direction)).unzip();
        (proof.len(), siblings, directions)
    }

    #[rstest]
    #[case(0)]
    #[case(3)]
    #[case(4)]
    fn test_relay_valid_proof(#[case] index: usize) {
        let (relay, block) = relay(RelayConfig::default(), 0);
        let (len, siblings, directions) = proof_parts(index);
        let recorder = Recorder::default();

        let result = relay.relay_tx(leaves()[index], len, siblings, directions, block, &recorder);

        assert_eq!(result, Ok(true));
        assert_eq!(*recorder.0.borrow(), vec![true]);
    }

    #[test]
    fn test_relay_wrong_tx_reports_false() {
        let (relay, block) = relay(RelayConfig::default(), 0);
        let (len, siblings, directions) = proof_parts(1);
        let recorder = Recorder::default();

        let result =
            relay.relay_tx(B256::repeat_byte(0xee), len, siblings, directions, block, &recorder);

        assert_eq!(result, Ok(false));
        assert_eq!(*recorder.0.borrow(), vec![false]);
    }

    #[test]
    fn test_relay_accepts_closure_consumer() {
        let (relay, block) = relay(RelayConfig::default(), 0);
        let (len, siblings, directions) = proof_parts(2);
        let seen = RefCell::new(None);

        let consumer = |verified: bool| *seen.borrow_mut() = Some(verified);
        relay.relay_tx(leaves()[2], len, siblings, directions, block, &consumer).unwrap();

        assert_eq!(*seen.borrow(), Some(true));
    }

    #[test]
    fn test_relay_unknown_block() {
        let (relay, _) = relay(RelayConfig::default(), 0);
        let (len, siblings, directions) = proof_parts(0);
        let recorder = Recorder::default();
        let unknown = B256::repeat_byte(0x77);

        let result = relay.relay_tx(leaves()[0], len, siblings, directions, unknown, &recorder);

        assert_eq!(result, Err(RelayError::UnknownBlock(unknown)));
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_relay_block_off_main_chain() {
        let (relay, block) = relay(RelayConfig::default(), 0);
        let fork = B256::repeat_byte(0xf0);
        relay.submit_header(fork, ANCHOR, B256::ZERO).unwrap();
        let tip = B256::repeat_byte(0xf1);
        relay.submit_header(tip, fork, B256::ZERO).unwrap();
        assert_eq!(relay.heaviest_block().unwrap(), tip);

        let (len, siblings, directions) = proof_parts(0);
        let recorder = Recorder::default();
        let result = relay.relay_tx(leaves()[0], len, siblings, directions, block, &recorder);

        assert_eq!(result, Err(RelayError::NotOnMainChain(block)));
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_relay_malformed_proof() {
        let (relay, block) = relay(RelayConfig::default(), 0);
        let (len, siblings, mut directions) = proof_parts(0);
        directions.pop();
        let recorder = Recorder::default();

        let result = relay.relay_tx(leaves()[0], len, siblings, directions, block, &recorder);

        assert_eq!(
            result,
            Err(RelayError::MalformedProof(ProofError::LengthMismatch {
                expected: len,
                siblings: len,
                directions: len - 1,
            }))
        );
        assert!(recorder.0.borrow().is_empty());
    }

    #[rstest]
    #[case::not_buried(2, 1, false)]
    #[case::exactly_buried(2, 2, true)]
    #[case::deeply_buried(2, 5, true)]
    fn test_relay_min_confirmations(
        #[case] required: u64,
        #[case] depth: u8,
        #[case] accepted: bool,
    ) {
        let (relay, block) = relay(RelayConfig::default().with_min_confirmations(required), depth);
        let (len, siblings, directions) = proof_parts(0);
        let recorder = Recorder::default();

        let result = relay.relay_tx(leaves()[0], len, siblings, directions, block, &recorder);

        if accepted {
            assert_eq!(result, Ok(true));
        } else {
            assert_eq!(
                result,
                Err(RelayError::InsufficientConfirmations {
                    block,
                    required,
                    actual: u64::from(depth),
                })
            );
            assert!(recorder.0.borrow().is_empty());
        }
    }

    #[test]
    fn test_verify_tx_does_not_need_consumer() {
        let (relay, block) = relay(RelayConfig::default(), 1);
        let proof = MerkleTree::from_leaves(leaves()).unwrap().proof(4).unwrap();
        assert_eq!(relay.verify_tx(leaves()[4], &proof, block), Ok(true));
        assert_eq!(relay.verify_tx(leaves()[3], &proof, block), Ok(false));
    }

    #[rstest]
    #[case::zero_hash(B256::ZERO, ANCHOR)]
    #[case::self_parent(B256::repeat_byte(0x11), B256::repeat_byte(0x11))]
    fn test_submit_malformed_header(#[case] block: B256, #[case] prev: B256) {
        let (relay, _) = relay(RelayConfig::default(), 0);
        let result = relay.submit_header(block, prev, B256::ZERO);
        assert!(matches!(result, Err(RelayError::MalformedHeader(_))));
    }

    #[test]
    fn test_submit_raw_header_rejects_bad_length() {
        let (relay, _) = relay(RelayConfig::default(), 0);
        let result = relay.submit_raw_header(&[0u8; 79]);
        assert!(matches!(result, Err(RelayError::MalformedHeader(_))));
    }

    #[test]
    fn test_header_lookup() {
        let (relay, block) = relay(RelayConfig::default(), 0);
        assert_eq!(relay.header(block).unwrap().prev_block, ANCHOR);
        let unknown = B256::repeat_byte(0x77);
        assert_eq!(relay.header(unknown), Err(RelayError::UnknownBlock(unknown)));
    }
}
