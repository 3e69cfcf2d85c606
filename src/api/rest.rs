use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::aggregate::Aggregator;
use crate::observability::metrics;
use crate::status::StatusRegistry;
use crate::types::ids::StreamId;
use crate::types::sample::{RollupResult, SourceStatus};

/// 4 hours, the dashboard chart's tick grid.
const DEFAULT_BUCKET_SECS: u64 = 14_400;

pub struct ApiState {
    pub aggregator: Arc<Aggregator>,
    pub status: Arc<StatusRegistry>,
}

pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/streams", get(list_streams))
        .route("/api/streams/:stream_id/rollups", get(get_rollups))
        .route("/api/status", get(get_status))
        .route("/metrics", get(export_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn list_streams(State(state): State<Arc<ApiState>>) -> Json<Vec<StreamId>> {
    Json(state.aggregator.stream_ids())
}

#[derive(Deserialize)]
struct RollupParams {
    bucket_secs: Option<u64>,
}

async fn get_rollups(
    State(state): State<Arc<ApiState>>,
    Path(stream_id): Path<String>,
    Query(params): Query<RollupParams>,
) -> Result<Json<Vec<RollupResult>>, StatusCode> {
    let bucket_secs = params.bucket_secs.unwrap_or(DEFAULT_BUCKET_SECS);
    if bucket_secs == 0 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let rollups = state
        .aggregator
        .snapshot(&StreamId::new(stream_id), Duration::from_secs(bucket_secs))
        .collect();
    Ok(Json(rollups))
}

async fn get_status(State(state): State<Arc<ApiState>>) -> Json<Vec<SourceStatus>> {
    Json(state.status.snapshot())
}

async fn export_metrics() -> String {
    metrics::render()
}
