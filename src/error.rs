use thiserror::Error;

use crate::types::ids::{SourceId, StreamId};
use crate::types::timestamp::Timestamp;

#[derive(Error, Debug)]
pub enum Error {
    // Ingestion Errors
    #[error("value {value} out of range [{min}, {max}] for stream {stream_id}")]
    OutOfRange {
        stream_id: StreamId,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("sample at {timestamp} for stream {stream_id} outside skew window around {now}")]
    StaleOrFutureSample {
        stream_id: StreamId,
        timestamp: Timestamp,
        now: Timestamp,
    },

    // Feed Errors
    #[error("feed {source_id} poll failed: {reason}")]
    FeedPollFailed { source_id: SourceId, reason: String },

    // System Errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, Error>;
