//! The `verify` subcommand.

use crate::{fixture::Fixture, flags::RelayArgs};
use alloy_primitives::B256;
use anyhow::{Context, Result};
use btcrelay_storage::InMemoryBlockStore;
use clap::Parser;
use serde::Serialize;
use std::{cell::Cell, path::PathBuf};
use tracing::info;

/// Replays a fixture's headers into an in-memory relay and relays its transaction proof.
#[derive(Parser, Clone, Debug)]
pub struct VerifyCommand {
    /// Path to the JSON fixture.
    #[arg(long, short = 'f', env = "BTCRELAY_FIXTURE")]
    pub fixture: PathBuf,
    /// Overrides for the fixture's relay configuration.
    #[command(flatten)]
    pub relay: RelayArgs,
}

/// The outcome of a `verify` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReport {
    /// The relayed transaction.
    pub tx_hash: B256,
    /// The block the transaction was proven against.
    pub block_hash: B256,
    /// The heaviest block after replay.
    pub heaviest_block: B256,
    /// Absolute height of the heaviest block.
    pub chain_height: u64,
    /// Blocks built on top of `block_hash`.
    pub confirmations: Option<u64>,
    /// Whether the proof reproduced the block's merkle root.
    pub verified: bool,
}

impl VerifyCommand {
    /// Runs the subcommand.
    pub fn run(&self) -> Result<VerifyReport> {
        let fixture = Fixture::load(&self.fixture)?;
        let config = self.relay.apply(fixture.config);
        let relay = fixture.replay(InMemoryBlockStore::new(), config)?;

        let proof = &fixture.proof;
        let notified = Cell::new(None);
        let verified = relay
            .relay_tx(
                proof.tx_hash,
                proof.proof_len(),
                proof.siblings.clone(),
                proof.directions.clone(),
                proof.block_hash,
                &|verified: bool| notified.set(Some(verified)),
            )
            .with_context(|| format!("Failed to relay transaction {}", proof.tx_hash))?;
        info!(target: "btcrelay", tx_hash = %proof.tx_hash, ?notified, "Consumer notified");

        Ok(VerifyReport {
            tx_hash: proof.tx_hash,
            block_hash: proof.block_hash,
            heaviest_block: relay.heaviest_block()?,
            chain_height: relay.chain_height()?,
            confirmations: relay.chain().confirmations(proof.block_hash)?,
            verified,
        })
    }
}
