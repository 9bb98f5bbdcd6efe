//! Chain tracking and transaction relay for Bitcoin block headers.
//!
//! The [`ChainTracker`] links submitted headers to a trusted [`Anchor`], keeps track of the
//! heaviest chain (longest, first seen wins ties) and answers main-chain membership queries
//! with a bounded ancestor walk. The [`RelayService`] sits on top of it: it accepts headers and
//! checks merkle inclusion proofs against blocks on the main chain, handing the result to a
//! [`VerificationConsumer`].

#![doc(issue_tracker_base_url = "https://github.com/btcrelay/btcrelay-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{Anchor, DEFAULT_MAX_TRAVERSAL_DEPTH, RelayConfig};

mod errors;
pub use errors::{ChainError, RelayError};

mod chain;
pub use chain::{BlockStatus, ChainTracker, Membership, RecordOutcome};

mod relay;
pub use relay::{RelayService, VerificationConsumer};

#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::Metrics;
