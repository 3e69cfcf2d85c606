pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod ingest;
pub mod observability;
pub mod status;
pub mod types;
