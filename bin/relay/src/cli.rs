//! Contains the btcrelay CLI.

use crate::{
    commands::{MerkleRootCommand, VerifyCommand},
    flags::GlobalArgs,
    version,
};
use anyhow::Result;
use btcrelay_cli::cli_styles;
use clap::{Parser, Subcommand};

/// Subcommands for the CLI.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Replays a fixture's headers and relays its transaction proof.
    Verify(VerifyCommand),
    /// Computes the merkle root of a list of transaction hashes.
    MerkleRoot(MerkleRootCommand),
}

/// The btcrelay CLI.
#[derive(Parser, Clone, Debug)]
#[command(
    author,
    version = version::SHORT_VERSION,
    long_version = version::LONG_VERSION,
    about,
    styles = cli_styles(),
    long_about = None
)]
pub struct Cli {
    /// Global arguments for the CLI.
    #[command(flatten)]
    pub global: GlobalArgs,
    /// The subcommand to run.
    #[command(subcommand)]
    pub subcommand: Commands,
}

impl Cli {
    /// Runs the CLI.
    pub fn run(self) -> Result<()> {
        self.global.init_stack()?;

        let output = match self.subcommand {
            Commands::Verify(verify) => serde_json::to_string_pretty(&verify.run()?)?,
            Commands::MerkleRoot(merkle_root) => merkle_root.run()?,
        };
        println!("{output}");
        Ok(())
    }
}
