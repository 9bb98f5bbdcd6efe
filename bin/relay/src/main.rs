#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/btcrelay/btcrelay-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use clap::Parser;

pub mod cli;
pub mod commands;
pub mod fixture;
pub mod flags;
pub(crate) mod version;

fn main() {
    btcrelay_cli::backtrace::enable();
    if let Err(err) = cli::Cli::parse().run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
