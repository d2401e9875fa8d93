//! Network metrics endpoints. Reserved; both always fail.

use super::{unimplemented_endpoint, AppState, FETCH_METRICS_OVERVIEW, FETCH_METRICS_THROUGHPUT};
use crate::domain::error::ApiResult;
use axum::extract::State;
use axum::response::Response;

/// `GET /metrics/overview`
pub async fn fetch_metrics_overview(State(state): State<AppState>) -> ApiResult<Response> {
    unimplemented_endpoint(&state, FETCH_METRICS_OVERVIEW)
}

/// `GET /metrics/throughput`
pub async fn fetch_metrics_throughput(State(state): State<AppState>) -> ApiResult<Response> {
    unimplemented_endpoint(&state, FETCH_METRICS_THROUGHPUT)
}
