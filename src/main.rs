use std::sync::Arc;

use anyhow::Context;

use nordicflow::aggregate::Aggregator;
use nordicflow::api::{create_router, ApiState};
use nordicflow::config::loader::AppConfig;
use nordicflow::feed::poller::run_feed;
use nordicflow::feed::simulated::SimulatedFeed;
use nordicflow::ingest::Ingestor;
use nordicflow::observability::{metrics, tracing::init_tracing};
use nordicflow::status::StatusRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    metrics::register_metrics();

    let env = std::env::var("NORDICFLOW_ENV").unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env).context("loading configuration")?;

    // Core state is built once here and injected by reference; nothing below
    // reaches for ambient singletons.
    let aggregator = Arc::new(Aggregator::new(&config.core));
    let status = Arc::new(StatusRegistry::new(&config.core));
    let ingestor = Arc::new(Ingestor::new(&config.core, aggregator.clone(), status.clone()));

    for feed in config.feeds.iter().filter(|f| f.enabled) {
        status.register(&feed.source_id);
        let connector = SimulatedFeed::new(feed.source_id.clone(), feed.streams.clone());
        tokio::spawn(run_feed(connector, ingestor.clone(), feed.poll_interval));
    }

    let state = Arc::new(ApiState {
        aggregator,
        status,
    });
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.api.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.api.bind_addr))?;
    tracing::info!(addr = %config.api.bind_addr, "serving dashboard API");
    axum::serve(listener, router).await?;

    Ok(())
}
