use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::ids::StreamId;

pub mod loader;

/// Accepted value band for one stream. Samples outside are rejected.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CoreConfig {
    /// Retained samples per stream; oldest-by-timestamp evicted on overflow.
    pub ring_capacity: usize,
    /// Allowed deviation between a sample's timestamp and ingestion time.
    pub max_skew: Duration,
    /// Per-stream sane ranges; streams without an entry accept any finite value.
    pub value_ranges: HashMap<StreamId, ValueRange>,
    /// A source with no liveness signal for this long reports `down`.
    pub down_threshold: Duration,
    /// Consecutive ingestion errors before a source reports `degraded`.
    pub degraded_error_threshold: u32,
    /// Latency above which an otherwise healthy source reports `processing`.
    pub processing_latency_threshold_ms: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            ring_capacity: 1024,
            max_skew: Duration::from_secs(300),       // 5 minutes
            value_ranges: HashMap::new(),
            down_threshold: Duration::from_secs(120), // 2 minutes
            degraded_error_threshold: 3,
            processing_latency_threshold_ms: 250,
        }
    }
}

impl CoreConfig {
    /// Rejects malformed configuration at construction time, not at call time.
    pub fn validate(&self) -> Result<()> {
        if self.ring_capacity == 0 {
            return Err(Error::ConfigError("ring_capacity must be at least 1".into()));
        }
        if self.max_skew.is_zero() {
            return Err(Error::ConfigError("max_skew must be non-zero".into()));
        }
        if self.down_threshold.is_zero() {
            return Err(Error::ConfigError("down_threshold must be non-zero".into()));
        }
        if self.degraded_error_threshold == 0 {
            return Err(Error::ConfigError(
                "degraded_error_threshold must be at least 1".into(),
            ));
        }
        for (stream_id, range) in &self.value_ranges {
            if !range.min.is_finite() || !range.max.is_finite() || range.min >= range.max {
                return Err(Error::ConfigError(format!(
                    "invalid value range [{}, {}] for stream {}",
                    range.min, range.max, stream_id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = CoreConfig {
            ring_capacity: 0,
            ..CoreConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn inverted_range_rejected() {
        let mut config = CoreConfig::default();
        config.value_ranges.insert(
            StreamId::from("spot_price_eur_mwh"),
            ValueRange { min: 500.0, max: 0.0 },
        );
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }
}
