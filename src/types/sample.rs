use serde::{Deserialize, Serialize};

use crate::types::ids::{SourceId, StreamId};
use crate::types::timestamp::Timestamp;

/// A single validated observation. Immutable once created.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: Timestamp,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: Timestamp, value: f64) -> Self {
        Sample { timestamp, value }
    }
}

/// Aggregate statistics for one time bucket. Recomputed on query, never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RollupResult {
    pub stream_id: StreamId,
    pub bucket_start: Timestamp,
    pub bucket_end: Timestamp,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub sample_count: usize,
    /// `None` for the first bucket, or when the prior bucket's average is zero.
    pub pct_change_vs_prior_bucket: Option<f64>,
}

/// Operational state of an upstream source, derived from its counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceState {
    Operational,
    Degraded,
    Processing,
    Down,
}

/// Point-in-time health view of one upstream source.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SourceStatus {
    pub source_id: SourceId,
    pub last_seen: Timestamp,
    pub last_latency_ms: u32,
    pub consecutive_errors: u32,
    pub state: SourceState,
}

#[cfg(test)]
mod tests {
    use super::*;

    // The dashboard consumes these strings verbatim for its status dots.
    #[test]
    fn source_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SourceState::Operational).unwrap(),
            "\"operational\""
        );
        assert_eq!(
            serde_json::to_string(&SourceState::Processing).unwrap(),
            "\"processing\""
        );
    }

    #[test]
    fn rollup_pct_change_serializes_as_null_when_absent() {
        let rollup = RollupResult {
            stream_id: StreamId::from("spot_price_eur_mwh"),
            bucket_start: Timestamp::from_millis(0),
            bucket_end: Timestamp::from_millis(1000),
            avg: 1.0,
            min: 1.0,
            max: 1.0,
            sample_count: 1,
            pct_change_vs_prior_bucket: None,
        };
        let json: serde_json::Value = serde_json::to_value(&rollup).unwrap();
        assert!(json["pct_change_vs_prior_bucket"].is_null());
    }
}
