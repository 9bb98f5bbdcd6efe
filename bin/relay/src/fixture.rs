//! JSON fixtures describing a header chain and a transaction proof to relay.

use alloy_primitives::{B256, Bytes};
use anyhow::{Context, Result};
use btcrelay_core::{Anchor, RelayConfig, RelayService};
use btcrelay_merkle::Direction;
use btcrelay_primitives::BlockHeader;
use btcrelay_storage::BlockStore;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};
use tracing::debug;

/// A relay scenario: an anchor, the headers built on it and one inclusion proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    /// Relay configuration. Missing fields take their defaults.
    #[serde(default)]
    pub config: RelayConfig,
    /// The trusted block the relay starts from.
    pub anchor: Anchor,
    /// Headers to submit, in submission order.
    #[serde(default)]
    pub headers: Vec<HeaderEntry>,
    /// The transaction proof to relay once every header is submitted.
    pub proof: ProofFixture,
}

/// A header to submit, either pre-hashed or as the raw 80-byte serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderEntry {
    /// A hex-encoded 80-byte header. The hash is computed from it.
    Raw {
        /// The serialized header.
        raw: Bytes,
    },
    /// A header with a caller-supplied hash.
    Hashed {
        /// The block hash.
        hash: B256,
        /// The header fields.
        #[serde(flatten)]
        header: BlockHeader,
    },
}

/// The inputs of a single `relay_tx` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofFixture {
    /// Hash of the transaction to prove.
    pub tx_hash: B256,
    /// Block the transaction is claimed to be in.
    pub block_hash: B256,
    /// Declared proof length. Defaults to the number of siblings.
    #[serde(default)]
    pub proof_len: Option<usize>,
    /// Sibling hashes from the leaf upwards.
    pub siblings: Vec<B256>,
    /// Side each sibling sits on.
    pub directions: Vec<Direction>,
}

impl ProofFixture {
    /// Returns the declared proof length.
    pub fn proof_len(&self) -> usize {
        self.proof_len.unwrap_or(self.siblings.len())
    }
}

impl Fixture {
    /// Reads a fixture from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open fixture {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse fixture {}", path.display()))
    }

    /// Builds a relay over `store` and submits every header in order.
    pub fn replay<S>(&self, store: S, config: RelayConfig) -> Result<RelayService<S>>
    where
        S: BlockStore,
    {
        let relay = RelayService::new(store, self.anchor, config)
            .context("Failed to initialize relay from anchor")?;

        for (index, entry) in self.headers.iter().enumerate() {
            let hash = match entry {
                HeaderEntry::Raw { raw } => relay
                    .submit_raw_header(raw)
                    .with_context(|| format!("Failed to submit raw header #{index}"))?,
                HeaderEntry::Hashed { hash, header } => {
                    relay
                        .submit_header(*hash, header.prev_block, header.merkle_root)
                        .with_context(|| format!("Failed to submit header #{index} ({hash})"))?;
                    *hash
                }
            };
            debug!(target: "btcrelay", index, %hash, "Replayed header");
        }

        Ok(relay)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use btcrelay_storage::InMemoryBlockStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub(crate) const BLOCK_100000_FIXTURE: &str = r#"{
        "anchor": {
            "hash": "0x000000000002d01c1fccc21636b607dfd930d31d01c3a62104612a1719011250",
            "header": {
                "prevBlock": "0x0000000000000000000000000000000000000000000000000000000000000000",
                "merkleRoot": "0x0000000000000000000000000000000000000000000000000000000000000000"
            },
            "height": 99999
        },
        "headers": [
            { "raw": "0x0100000050120119172a610421a6c3011dd330d9df07b63616c2cc1f1cd00200000000006657a9252aacd5c0b2940996ecff952228c3067cc38d4885efb5a4ac4247e9f337221b4d4c86041b0f2b5710" },
            {
                "hash": "0x00000000000080b66c911bd5ba14a74260057311eaeb1982802f7010f1a9f090",
                "prevBlock": "0x000000000003ba27aa200b1cecaad478d2b00432346c3f1f3986da1afd33e506",
                "merkleRoot": "0x0000000000000000000000000000000000000000000000000000000000000000"
            }
        ],
        "proof": {
            "txHash": "0x8c14f0db3df150123e6f3dbbf30f8b955a8249b62ac1d1ff16284aefa3d06d87",
            "blockHash": "0x000000000003ba27aa200b1cecaad478d2b00432346c3f1f3986da1afd33e506",
            "siblings": [
                "0xfff2525b8931402dd09222c50775608f75787bd2b87e56995a7bdd30f79702c4",
                "0x8e30899078ca1813be036a073bbf80b86cdddde1c96e9e9c99e9e3782df4ae49"
            ],
            "directions": ["right", "right"]
        }
    }"#;

    pub(crate) fn write_fixture(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_fixture() {
        let file = write_fixture(BLOCK_100000_FIXTURE);
        let fixture = Fixture::load(file.path()).unwrap();

        assert_eq!(fixture.config, RelayConfig::default());
        assert_eq!(fixture.anchor.height, 99_999);
        assert_eq!(fixture.headers.len(), 2);
        assert!(matches!(fixture.headers[0], HeaderEntry::Raw { .. }));
        assert!(matches!(fixture.headers[1], HeaderEntry::Hashed { .. }));
        assert_eq!(fixture.proof.proof_len(), 2);
        assert_eq!(fixture.proof.directions, vec![Direction::Right, Direction::Right]);
    }

    #[test]
    fn test_replay_fixture() {
        let file = write_fixture(BLOCK_100000_FIXTURE);
        let fixture = Fixture::load(file.path()).unwrap();

        let relay = fixture.replay(InMemoryBlockStore::new(), fixture.config).unwrap();

        assert_eq!(relay.chain_height().unwrap(), 100_001);
        assert!(relay.is_on_main_chain(fixture.proof.block_hash));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Fixture::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to open fixture"));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let file = write_fixture("{ \"anchor\": 1 }");
        let err = Fixture::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse fixture"));
    }

    #[test]
    fn test_load_rejects_unknown_direction() {
        let file = write_fixture(&BLOCK_100000_FIXTURE.replacen("\"right\"", "\"up\"", 1));
        assert!(Fixture::load(file.path()).is_err());
    }

    #[test]
    fn test_load_keeps_mismatched_proof() {
        let file = write_fixture(&BLOCK_100000_FIXTURE.replace(", \"right\"]", "]"));
        let fixture = Fixture::load(file.path()).unwrap();
        assert_eq!(fixture.proof.siblings.len(), 2);
        assert_eq!(fixture.proof.directions, vec![Direction::Right]);
    }

    #[test]
    fn test_replay_reports_malformed_raw_header() {
        let fixture = BLOCK_100000_FIXTURE.replace("0x0100000050", "0x50");
        let file = write_fixture(&fixture);
        let fixture = Fixture::load(file.path()).unwrap();

        let err = fixture.replay(InMemoryBlockStore::new(), fixture.config).unwrap_err();
        assert!(err.to_string().contains("Failed to submit raw header #0"));
    }
}
