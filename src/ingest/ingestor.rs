use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::aggregate::Aggregator;
use crate::config::{CoreConfig, ValueRange};
use crate::error::{Error, Result};
use crate::observability::metrics;
use crate::status::StatusRegistry;
use crate::types::ids::{SourceId, StreamId};
use crate::types::sample::Sample;
use crate::types::timestamp::Timestamp;

/// Validates and normalizes incoming samples, then delegates: accepted samples
/// go to the Aggregator, and every call (accepted or rejected) is reported to
/// the Status Registry as a liveness signal. Holds no mutable state of its
/// own beyond configuration.
pub struct Ingestor {
    aggregator: Arc<Aggregator>,
    status: Arc<StatusRegistry>,
    max_skew: Duration,
    value_ranges: HashMap<StreamId, ValueRange>,
}

impl Ingestor {
    pub fn new(
        config: &CoreConfig,
        aggregator: Arc<Aggregator>,
        status: Arc<StatusRegistry>,
    ) -> Self {
        Ingestor {
            aggregator,
            status,
            max_skew: config.max_skew,
            value_ranges: config.value_ranges.clone(),
        }
    }

    /// Records one sample. The latency reported to the registry is the
    /// ingestion lag between the sample's timestamp and arrival.
    pub fn record(
        &self,
        source_id: &SourceId,
        stream_id: &StreamId,
        timestamp: Timestamp,
        value: f64,
    ) -> Result<()> {
        let now = Timestamp::now();
        let lag_ms = now.saturating_since(timestamp).as_millis().min(u32::MAX as u128) as u32;
        self.record_with_latency(source_id, stream_id, timestamp, value, lag_ms)
    }

    /// Same as [`record`](Self::record), with the liveness latency measured by
    /// the caller (feed pollers report upstream fetch latency here).
    pub fn record_with_latency(
        &self,
        source_id: &SourceId,
        stream_id: &StreamId,
        timestamp: Timestamp,
        value: f64,
        latency_ms: u32,
    ) -> Result<()> {
        match self.validate(stream_id, timestamp, value) {
            Ok(()) => {
                self.aggregator.update(stream_id, Sample::new(timestamp, value));
                self.status.touch(source_id, latency_ms, true);
                metrics::SAMPLES_INGESTED.inc();
                metrics::ACTIVE_STREAMS.set(self.aggregator.stream_count() as i64);
                Ok(())
            }
            Err(e) => {
                // A rejected sample still counts as a liveness signal.
                self.status.touch(source_id, latency_ms, false);
                metrics::SAMPLES_REJECTED.inc();
                tracing::warn!(
                    source = %source_id,
                    stream = %stream_id,
                    error = %e,
                    "sample rejected"
                );
                Err(e)
            }
        }
    }

    /// Reports a failed upstream poll as a liveness signal carrying no
    /// sample: `last_seen` advances, the error counter grows.
    pub fn record_failure(&self, source_id: &SourceId, latency_ms: u32) {
        self.status.touch(source_id, latency_ms, false);
    }

    fn validate(&self, stream_id: &StreamId, timestamp: Timestamp, value: f64) -> Result<()> {
        let range = self
            .value_ranges
            .get(stream_id)
            .copied()
            .unwrap_or(ValueRange {
                min: f64::NEG_INFINITY,
                max: f64::INFINITY,
            });
        if !value.is_finite() || !range.contains(value) {
            return Err(Error::OutOfRange {
                stream_id: stream_id.clone(),
                value,
                min: range.min,
                max: range.max,
            });
        }

        let now = Timestamp::now();
        if timestamp < now - self.max_skew || timestamp > now + self.max_skew {
            return Err(Error::StaleOrFutureSample {
                stream_id: stream_id.clone(),
                timestamp,
                now,
            });
        }

        Ok(())
    }
}
