use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Histogram, HistogramOpts, IntGauge, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Ingestion metrics
    pub static ref SAMPLES_INGESTED: Counter = Counter::new(
        "samples_ingested_total",
        "Total number of samples accepted"
    ).unwrap();

    pub static ref SAMPLES_REJECTED: Counter = Counter::new(
        "samples_rejected_total",
        "Total number of samples rejected at validation"
    ).unwrap();

    pub static ref ACTIVE_STREAMS: IntGauge = IntGauge::new(
        "active_streams",
        "Number of streams with at least one retained sample"
    ).unwrap();

    // Feed metrics
    pub static ref FEED_POLL_LATENCY: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "feed_poll_latency_seconds",
            "Upstream feed poll latency"
        ).buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5])
    ).unwrap();
}

pub fn register_metrics() {
    REGISTRY.register(Box::new(SAMPLES_INGESTED.clone())).unwrap();
    REGISTRY.register(Box::new(SAMPLES_REJECTED.clone())).unwrap();
    REGISTRY.register(Box::new(ACTIVE_STREAMS.clone())).unwrap();
    REGISTRY.register(Box::new(FEED_POLL_LATENCY.clone())).unwrap();
}

/// Prometheus text exposition for the `/metrics` route.
pub fn render() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if encoder.encode(&REGISTRY.gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
