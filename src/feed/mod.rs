pub mod poller;
pub mod simulated;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::ids::{SourceId, StreamId};
use crate::types::timestamp::Timestamp;

/// One reading as delivered by an upstream feed, before validation.
#[derive(Clone, Debug)]
pub struct RawReading {
    pub stream_id: StreamId,
    pub timestamp: Timestamp,
    pub value: f64,
}

/// An upstream feed. Connectors do the network or file IO; the core never
/// blocks on them. Each poll returns a batch of readings to run through the
/// Ingestor.
#[async_trait]
pub trait FeedConnector: Send {
    async fn poll(&mut self) -> Result<Vec<RawReading>>;

    fn source_id(&self) -> &SourceId;
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FeedSourceConfig {
    pub source_id: SourceId,
    pub streams: Vec<StreamId>,
    pub poll_interval: Duration,
    pub enabled: bool,
}
