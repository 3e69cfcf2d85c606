use std::time::Duration;

use dashmap::DashMap;

use crate::config::CoreConfig;
use crate::types::ids::SourceId;
use crate::types::sample::{SourceState, SourceStatus};
use crate::types::timestamp::Timestamp;

/// Raw liveness counters for one upstream source. State is never stored;
/// it is recomputed from these fields on every read.
#[derive(Clone, Copy, Debug)]
struct SourceHealth {
    last_seen: Timestamp,
    last_latency_ms: u32,
    consecutive_errors: u32,
}

/// Tracks operational state per upstream source, independent of the
/// Aggregator. Mutation is serialized per source by the sharded map.
pub struct StatusRegistry {
    sources: DashMap<SourceId, SourceHealth>,
    down_threshold: Duration,
    degraded_error_threshold: u32,
    processing_latency_threshold_ms: u32,
}

impl StatusRegistry {
    pub fn new(config: &CoreConfig) -> Self {
        StatusRegistry {
            sources: DashMap::new(),
            down_threshold: config.down_threshold,
            degraded_error_threshold: config.degraded_error_threshold,
            processing_latency_threshold_ms: config.processing_latency_threshold_ms,
        }
    }

    /// Seeds an entry so a source that never ingests decays to `down` once
    /// `down_threshold` passes. A no-op for sources already tracked.
    pub fn register(&self, source_id: &SourceId) {
        self.sources
            .entry(source_id.clone())
            .or_insert_with(|| SourceHealth {
                last_seen: Timestamp::now(),
                last_latency_ms: 0,
                consecutive_errors: 0,
            });
    }

    /// Records a liveness signal. A rejected sample still updates `last_seen`
    /// but increments the error counter; a success resets it.
    pub fn touch(&self, source_id: &SourceId, latency_ms: u32, success: bool) {
        self.touch_at(source_id, Timestamp::now(), latency_ms, success);
    }

    pub fn touch_at(&self, source_id: &SourceId, now: Timestamp, latency_ms: u32, success: bool) {
        let mut health = self
            .sources
            .entry(source_id.clone())
            .or_insert_with(|| SourceHealth {
                last_seen: now,
                last_latency_ms: latency_ms,
                consecutive_errors: 0,
            });
        health.last_seen = now;
        health.last_latency_ms = latency_ms;
        health.consecutive_errors = if success {
            0
        } else {
            health.consecutive_errors.saturating_add(1)
        };
    }

    /// All tracked sources with freshly derived states, sorted by source id.
    pub fn snapshot(&self) -> Vec<SourceStatus> {
        self.snapshot_at(Timestamp::now())
    }

    pub fn snapshot_at(&self, now: Timestamp) -> Vec<SourceStatus> {
        let mut statuses: Vec<SourceStatus> = self
            .sources
            .iter()
            .map(|entry| {
                let health = entry.value();
                SourceStatus {
                    source_id: entry.key().clone(),
                    last_seen: health.last_seen,
                    last_latency_ms: health.last_latency_ms,
                    consecutive_errors: health.consecutive_errors,
                    state: self.derive_state(health, now),
                }
            })
            .collect();
        statuses.sort_by(|a, b| a.source_id.cmp(&b.source_id));
        statuses
    }

    /// Pure mapping from counters to state. Priority: `down` beats `degraded`
    /// beats `processing`; `operational` is the default.
    fn derive_state(&self, health: &SourceHealth, now: Timestamp) -> SourceState {
        if now.saturating_since(health.last_seen) > self.down_threshold {
            SourceState::Down
        } else if health.consecutive_errors >= self.degraded_error_threshold {
            SourceState::Degraded
        } else if health.last_latency_ms > self.processing_latency_threshold_ms {
            SourceState::Processing
        } else {
            SourceState::Operational
        }
    }
}
