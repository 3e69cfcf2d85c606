use async_trait::async_trait;

use crate::error::Result;
use crate::feed::{FeedConnector, RawReading};
use crate::types::ids::{SourceId, StreamId};
use crate::types::timestamp::Timestamp;

const MS_PER_DAY: u64 = 86_400_000;
const MS_PER_HOUR: u64 = 3_600_000;

// Hourly anchor points for the synthetic daily curves: morning/evening price
// peaks with matching consumption load.
const PRICE_CURVE: [(u64, f64); 7] = [
    (0, 12.5),
    (4, 10.2),
    (8, 45.8),
    (12, 38.4),
    (16, 42.1),
    (20, 25.6),
    (24, 12.5),
];
const CONSUMPTION_CURVE: [(u64, f64); 7] = [
    (0, 8500.0),
    (4, 7800.0),
    (8, 10500.0),
    (12, 11200.0),
    (16, 10800.0),
    (20, 9500.0),
    (24, 8500.0),
];

/// Deterministic stand-in for the real upstream APIs so the pipeline runs
/// end-to-end without credentials. Values follow a daily curve with a small
/// pseudo-random jitter.
pub struct SimulatedFeed {
    source_id: SourceId,
    streams: Vec<StreamId>,
    rng_state: u64,
}

impl SimulatedFeed {
    pub fn new(source_id: SourceId, streams: Vec<StreamId>) -> Self {
        SimulatedFeed {
            source_id,
            streams,
            rng_state: 0x9E37_79B9_7F4A_7C15,
        }
    }

    /// xorshift64, uniform in [-1, 1].
    fn jitter(&mut self) -> f64 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;
        (x as f64 / u64::MAX as f64) * 2.0 - 1.0
    }

    fn value_for(&mut self, stream_id: &StreamId, now: Timestamp) -> f64 {
        match stream_id.as_str() {
            "spot_price_eur_mwh" => daily_curve(&PRICE_CURVE, now) + self.jitter() * 2.0,
            "consumption_mw" => daily_curve(&CONSUMPTION_CURVE, now) + self.jitter() * 150.0,
            "grid_frequency_hz" => 50.0 + self.jitter() * 0.05,
            _ => 1.0 + self.jitter() * 0.1,
        }
    }
}

/// Piecewise-linear interpolation over the 24h anchor points.
fn daily_curve(curve: &[(u64, f64)], now: Timestamp) -> f64 {
    let ms_of_day = now.as_millis() % MS_PER_DAY;
    for window in curve.windows(2) {
        let (start_h, start_v) = window[0];
        let (end_h, end_v) = window[1];
        let start_ms = start_h * MS_PER_HOUR;
        let end_ms = end_h * MS_PER_HOUR;
        if ms_of_day >= start_ms && ms_of_day < end_ms {
            let t = (ms_of_day - start_ms) as f64 / (end_ms - start_ms) as f64;
            return start_v + (end_v - start_v) * t;
        }
    }
    curve[0].1
}

#[async_trait]
impl FeedConnector for SimulatedFeed {
    async fn poll(&mut self) -> Result<Vec<RawReading>> {
        let now = Timestamp::now();
        let readings = self
            .streams
            .clone()
            .into_iter()
            .map(|stream_id| {
                let value = self.value_for(&stream_id, now);
                RawReading {
                    stream_id,
                    timestamp: now,
                    value,
                }
            })
            .collect();
        Ok(readings)
    }

    fn source_id(&self) -> &SourceId {
        &self.source_id
    }
}
