use std::time::Duration;

use crate::types::ids::StreamId;
use crate::types::sample::{RollupResult, Sample};
use crate::types::timestamp::Timestamp;

/// Lazy, finite rollup sequence over a point-in-time copy of one stream's
/// samples, ordered by `bucket_start` ascending.
///
/// The bucket grid is anchored at the earliest retained sample; buckets that
/// contain no samples are skipped, so percent-change always compares against
/// the previous emitted bucket. Clone the iterator to restart it.
#[derive(Clone, Debug)]
pub struct Rollups {
    stream_id: StreamId,
    samples: Vec<Sample>,
    width_ms: u64,
    anchor: Timestamp,
    cursor: usize,
    prior_avg: Option<f64>,
}

impl Rollups {
    /// `samples` must be sorted by timestamp, as the ring maintains them.
    pub(crate) fn new(stream_id: StreamId, samples: Vec<Sample>, bucket_width: Duration) -> Self {
        let anchor = samples
            .first()
            .map(|s| s.timestamp)
            .unwrap_or(Timestamp::from_millis(0));
        Rollups {
            stream_id,
            samples,
            width_ms: (bucket_width.as_millis() as u64).max(1),
            anchor,
            cursor: 0,
            prior_avg: None,
        }
    }
}

impl Iterator for Rollups {
    type Item = RollupResult;

    fn next(&mut self) -> Option<RollupResult> {
        let first = self.samples.get(self.cursor)?;

        // Snap to the grid bucket holding the next unconsumed sample.
        let offset = first.timestamp.as_millis() - self.anchor.as_millis();
        let bucket_start = Timestamp::from_millis(
            self.anchor.as_millis() + (offset / self.width_ms) * self.width_ms,
        );
        let bucket_end = Timestamp::from_millis(bucket_start.as_millis() + self.width_ms);

        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut count = 0usize;
        while let Some(sample) = self.samples.get(self.cursor) {
            if sample.timestamp >= bucket_end {
                break;
            }
            sum += sample.value;
            min = min.min(sample.value);
            max = max.max(sample.value);
            count += 1;
            self.cursor += 1;
        }

        let avg = sum / count as f64;
        let pct_change = match self.prior_avg {
            Some(prior) if prior != 0.0 => Some((avg - prior) / prior * 100.0),
            _ => None,
        };
        self.prior_avg = Some(avg);

        Some(RollupResult {
            stream_id: self.stream_id.clone(),
            bucket_start,
            bucket_end,
            avg,
            min,
            max,
            sample_count: count,
            pct_change_vs_prior_bucket: pct_change,
        })
    }
}
