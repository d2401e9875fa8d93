//! HTTP handlers for the `/api/v2` query surface.
//!
//! Every handler follows one shape: open a [`RequestTracker`], validate path
//! and query parameters, make exactly one collaborator call, then hand the
//! result to [`RequestTracker::finish`] which classifies and records it.
//! Successful lookups carry a `Cache-Control: max-age` header.
//!
//! [`RequestTracker`]: crate::middleware::RequestTracker
//! [`RequestTracker::finish`]: crate::middleware::RequestTracker::finish

pub mod batch;
pub mod blob;
pub mod metrics;
pub mod operators;

use crate::domain::error::ApiResult;
use crate::domain::responses::HealthResponse;
use crate::middleware::ApiMetrics;
use crate::ports::outbound::{BlobMetadataStore, OperatorHandler};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

/// Base path of the query surface.
pub const API_BASE_PATH: &str = "/api/v2";

/// Cache age for blob and batch lookups, in seconds.
pub const MAX_FEED_BLOB_AGE: u64 = 300;
/// Cache age for operator stake, in seconds.
pub const MAX_OPERATORS_STAKE_AGE: u64 = 3600;
/// Cache age for operator reachability and node info, in seconds.
pub const MAX_OPERATOR_PORT_CHECK_AGE: u64 = 60;

// Endpoint names used as the `method` metrics label.
pub const FETCH_BLOB: &str = "FetchBlob";
pub const FETCH_BLOB_FEED: &str = "FetchBlobFeed";
pub const FETCH_BATCH: &str = "FetchBatch";
pub const FETCH_BATCH_FEED: &str = "FetchBatchFeed";
pub const FETCH_OPERATORS_STAKE: &str = "FetchOperatorsStake";
pub const FETCH_OPERATORS_NODE_INFO: &str = "FetchOperatorsNodeInfo";
pub const CHECK_OPERATORS_REACHABILITY: &str = "OperatorPortCheck";
pub const FETCH_NON_SIGNERS: &str = "FetchNonSigners";
pub const FETCH_METRICS_OVERVIEW: &str = "FetchMetricsOverview";
pub const FETCH_METRICS_THROUGHPUT: &str = "FetchMetricsThroughput";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub blob_store: Arc<dyn BlobMetadataStore>,
    pub operators: Arc<dyn OperatorHandler>,
    pub metrics: Arc<ApiMetrics>,
}

impl AppState {
    pub fn new(
        blob_store: Arc<dyn BlobMetadataStore>,
        operators: Arc<dyn OperatorHandler>,
        metrics: Arc<ApiMetrics>,
    ) -> Self {
        Self {
            blob_store,
            operators,
            metrics,
        }
    }
}

/// Build the handler router: `/` plus everything under [`API_BASE_PATH`].
///
/// No middleware is attached here; see [`DataApiServer::router`](crate::service::DataApiServer::router).
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/blob/blob/feed", get(blob::fetch_blob_feed))
        .route("/blob/blob/:blob_key", get(blob::fetch_blob))
        .route("/batch/batch/feed", get(batch::fetch_batch_feed))
        .route("/batch/batch/:batch_header_hash", get(batch::fetch_batch))
        .route("/operators/non-signers", get(operators::fetch_non_signers))
        .route("/operators/stake", get(operators::fetch_operators_stake))
        .route("/operators/nodeinfo", get(operators::fetch_operators_node_info))
        .route(
            "/operators/reachability",
            get(operators::check_operators_reachability),
        )
        .route("/metrics/overview", get(metrics::fetch_metrics_overview))
        .route("/metrics/throughput", get(metrics::fetch_metrics_throughput));

    Router::new()
        .route("/", get(root))
        .nest(API_BASE_PATH, api)
        .with_state(state)
}

/// Liveness probe.
async fn root() -> impl IntoResponse {
    (StatusCode::ACCEPTED, Json(HealthResponse::ok()))
}

/// JSON response with `Cache-Control: max-age=<max_age>`.
pub(crate) fn cached<T: Serialize>(max_age: u64, body: T) -> Response {
    (
        [(header::CACHE_CONTROL, format!("max-age={}", max_age))],
        Json(body),
    )
        .into_response()
}

/// Shared body of every reserved endpoint: one failed request, then 500.
pub(crate) fn unimplemented_endpoint(state: &AppState, endpoint: &'static str) -> ApiResult<Response> {
    state
        .metrics
        .track(endpoint)
        .finish(Err(crate::domain::error::ApiError::unimplemented(endpoint)))
}
