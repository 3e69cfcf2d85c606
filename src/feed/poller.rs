use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::interval;

use crate::feed::FeedConnector;
use crate::ingest::Ingestor;
use crate::observability::metrics;
use crate::types::ids::SourceId;

/// Drives one feed: polls at a fixed interval and runs every reading through
/// the Ingestor. Poll failures are reported to the registry as error touches,
/// so a feed that fails fast degrades instead of sitting at zero errors until
/// `down_threshold`; rejected readings count as error touches on their own.
pub async fn run_feed(
    mut connector: impl FeedConnector,
    ingestor: Arc<Ingestor>,
    poll_interval: Duration,
) {
    let source_id = connector.source_id().clone();
    tracing::info!(source = %source_id, interval_ms = poll_interval.as_millis() as u64, "feed started");

    let mut ticker = interval(poll_interval);
    loop {
        ticker.tick().await;
        poll_once(&mut connector, &ingestor, &source_id).await;
    }
}

async fn poll_once(
    connector: &mut impl FeedConnector,
    ingestor: &Ingestor,
    source_id: &SourceId,
) {
    let started = Instant::now();
    let result = connector.poll().await;
    let latency = started.elapsed();
    let latency_ms = latency.as_millis().min(u32::MAX as u128) as u32;

    let readings = match result {
        Ok(readings) => readings,
        Err(e) => {
            tracing::warn!(source = %source_id, error = %e, "feed poll failed");
            ingestor.record_failure(source_id, latency_ms);
            return;
        }
    };
    metrics::FEED_POLL_LATENCY.observe(latency.as_secs_f64());

    for reading in readings {
        // Rejections are already logged and recorded by the Ingestor.
        let _ = ingestor.record_with_latency(
            source_id,
            &reading.stream_id,
            reading.timestamp,
            reading.value,
            latency_ms,
        );
    }
}
