//! Metrics emitted by the chain tracker and relay service.

use crate::{RecordOutcome, RelayError};

/// Container for the relay's metric names and recording helpers.
#[derive(Debug, Clone)]
pub struct Metrics;

impl Metrics {
    /// Counter of submitted headers, labelled by outcome.
    pub const HEADERS_TOTAL: &'static str = "btcrelay_headers_total";
    /// Gauge tracking the absolute height of the heaviest block.
    pub const HEAVIEST_HEIGHT: &'static str = "btcrelay_heaviest_height";
    /// Counter of reorganizations of the heaviest chain.
    pub const REORG_TOTAL: &'static str = "btcrelay_reorg_total";
    /// Histogram of blocks abandoned by each reorganization.
    pub const REORG_DEPTH: &'static str = "btcrelay_reorg_depth";
    /// Counter of relay requests, labelled by result.
    pub const RELAY_TX_TOTAL: &'static str = "btcrelay_relay_tx_total";

    const OUTCOME_LABELS: [&'static str; 4] = ["duplicate", "unlinked", "linked", "new_head"];
    const RESULT_LABELS: [&'static str; 3] = ["verified", "rejected", "error"];

    /// Describes and zeroes every metric.
    ///
    /// Call once after installing a recorder.
    pub fn init() {
        Self::describe();
        Self::zero();
    }

    fn describe() {
        metrics::describe_counter!(
            Self::HEADERS_TOTAL,
            metrics::Unit::Count,
            "Total number of block headers submitted to the relay",
        );

        metrics::describe_gauge!(
            Self::HEAVIEST_HEIGHT,
            metrics::Unit::Count,
            "Height of the current heaviest block",
        );

        metrics::describe_counter!(
            Self::REORG_TOTAL,
            metrics::Unit::Count,
            "Total number of reorganizations of the heaviest chain",
        );

        metrics::describe_histogram!(
            Self::REORG_DEPTH,
            metrics::Unit::Count,
            "Number of blocks removed from the main chain by a reorganization",
        );

        metrics::describe_counter!(
            Self::RELAY_TX_TOTAL,
            metrics::Unit::Count,
            "Total number of transaction relay requests",
        );
    }

    fn zero() {
        for outcome in Self::OUTCOME_LABELS {
            metrics::counter!(Self::HEADERS_TOTAL, "outcome" => outcome).increment(0);
        }
        for result in Self::RESULT_LABELS {
            metrics::counter!(Self::RELAY_TX_TOTAL, "result" => result).increment(0);
        }
        metrics::counter!(Self::REORG_TOTAL).increment(0);
    }

    /// Sets the heaviest-height gauge. Seeded from the anchor when a tracker is created.
    pub(crate) fn record_heaviest(height: u64) {
        metrics::gauge!(Self::HEAVIEST_HEIGHT).set(height as f64);
    }

    pub(crate) fn record_header(outcome: &RecordOutcome) {
        let label = match outcome {
            RecordOutcome::Duplicate => Self::OUTCOME_LABELS[0],
            RecordOutcome::Unlinked => Self::OUTCOME_LABELS[1],
            RecordOutcome::Linked { .. } => Self::OUTCOME_LABELS[2],
            RecordOutcome::NewHead { height, reorg_depth, .. } => {
                Self::record_heaviest(*height);
                if let Some(depth) = reorg_depth.filter(|depth| *depth > 0) {
                    metrics::counter!(Self::REORG_TOTAL).increment(1);
                    metrics::histogram!(Self::REORG_DEPTH).record(depth as f64);
                }
                Self::OUTCOME_LABELS[3]
            }
        };
        metrics::counter!(Self::HEADERS_TOTAL, "outcome" => label).increment(1);
    }

    pub(crate) fn record_relay(result: &Result<bool, RelayError>) {
        let label = match result {
            Ok(true) => Self::RESULT_LABELS[0],
            Ok(false) => Self::RESULT_LABELS[1],
            Err(_) => Self::RESULT_LABELS[2],
        };
        metrics::counter!(Self::RELAY_TX_TOTAL, "result" => label).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Anchor, ChainTracker, RelayConfig};
    use alloy_primitives::B256;
    use btcrelay_primitives::BlockHeader;
    use btcrelay_storage::InMemoryBlockStore;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_heaviest_height_starts_at_anchor() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            Metrics::init();
            let anchor = Anchor::new(B256::repeat_byte(0xa0), BlockHeader::default(), 100_000);
            ChainTracker::new(InMemoryBlockStore::new(), anchor, RelayConfig::default()).unwrap();
        });

        let rendered = handle.render();
        assert!(rendered.contains("btcrelay_heaviest_height 100000"));
        assert!(!rendered.contains("btcrelay_heaviest_height 0\n"));
    }

    #[test]
    fn test_record_header_and_relay() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            Metrics::init();
            Metrics::record_header(&RecordOutcome::NewHead {
                head: B256::ZERO,
                height: 100_006,
                reorg_depth: Some(2),
            });
            Metrics::record_relay(&Ok(true));
        });

        let rendered = handle.render();
        assert!(rendered.contains("btcrelay_heaviest_height 100006"));
        assert!(rendered.contains("btcrelay_reorg_total 1"));
        assert!(rendered.contains(r#"btcrelay_relay_tx_total{result="verified"} 1"#));
        assert!(rendered.contains(r#"btcrelay_headers_total{outcome="new_head"} 1"#));
    }
}
