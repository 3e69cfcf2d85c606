use std::time::Duration;

use dashmap::DashMap;

use crate::aggregate::ring::SampleRing;
use crate::aggregate::rollup::Rollups;
use crate::config::CoreConfig;
use crate::types::ids::StreamId;
use crate::types::sample::Sample;

/// Owns every stream's bounded ring. Mutation is serialized per stream by the
/// sharded map; updates to different streams proceed independently.
pub struct Aggregator {
    streams: DashMap<StreamId, SampleRing>,
    ring_capacity: usize,
}

impl Aggregator {
    pub fn new(config: &CoreConfig) -> Self {
        Aggregator {
            streams: DashMap::new(),
            ring_capacity: config.ring_capacity,
        }
    }

    /// Inserts into the stream's ordered ring, auto-creating the stream on
    /// first sample.
    pub fn update(&self, stream_id: &StreamId, sample: Sample) {
        self.streams
            .entry(stream_id.clone())
            .or_insert_with(|| SampleRing::new(self.ring_capacity))
            .insert(sample);
    }

    /// Rollups over a point-in-time copy of the stream; the ring lock is
    /// released before any bucket is computed. An unknown stream yields an
    /// empty sequence, not an error.
    pub fn snapshot(&self, stream_id: &StreamId, bucket_width: Duration) -> Rollups {
        let samples = self
            .streams
            .get(stream_id)
            .map(|ring| ring.samples().to_vec())
            .unwrap_or_default();
        Rollups::new(stream_id.clone(), samples, bucket_width)
    }

    pub fn sample_count(&self, stream_id: &StreamId) -> usize {
        self.streams.get(stream_id).map(|ring| ring.len()).unwrap_or(0)
    }

    pub fn stream_ids(&self) -> Vec<StreamId> {
        let mut ids: Vec<StreamId> = self.streams.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn stream_count(&self) -> usize {
        self.streams.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::timestamp::Timestamp;

    fn aggregator(capacity: usize) -> Aggregator {
        let config = CoreConfig {
            ring_capacity: capacity,
            ..CoreConfig::default()
        };
        Aggregator::new(&config)
    }

    #[test]
    fn unknown_stream_snapshot_is_empty() {
        let agg = aggregator(16);
        let mut rollups = agg.snapshot(&StreamId::from("missing"), Duration::from_secs(3600));
        assert!(rollups.next().is_none());
    }

    #[test]
    fn update_auto_creates_stream() {
        let agg = aggregator(16);
        let stream = StreamId::from("spot_price_eur_mwh");
        agg.update(&stream, Sample::new(Timestamp::from_millis(1), 42.0));

        assert_eq!(agg.sample_count(&stream), 1);
        assert_eq!(agg.stream_ids(), vec![stream]);
    }

    #[test]
    fn snapshot_totals_match_retained_count() {
        let agg = aggregator(8);
        let stream = StreamId::from("consumption_mw");
        for i in 0..20u64 {
            agg.update(&stream, Sample::new(Timestamp::from_millis(i * 1000), i as f64));
        }

        // Capacity 8: only the newest 8 samples remain.
        assert_eq!(agg.sample_count(&stream), 8);
        let bucketed: usize = agg
            .snapshot(&stream, Duration::from_secs(2))
            .map(|r| r.sample_count)
            .sum();
        assert_eq!(bucketed, 8);
    }
}
