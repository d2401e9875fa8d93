//! Batch endpoints.

use super::{
    cached, unimplemented_endpoint, AppState, FETCH_BATCH, FETCH_BATCH_FEED, MAX_FEED_BLOB_AGE,
};
use crate::domain::error::{ApiError, ApiResult};
use crate::domain::keys::BatchHeaderHash;
use crate::domain::responses::BatchResponse;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use tracing::debug;

/// `GET /batch/batch/feed`
pub async fn fetch_batch_feed(State(state): State<AppState>) -> ApiResult<Response> {
    unimplemented_endpoint(&state, FETCH_BATCH_FEED)
}

/// `GET /batch/batch/{batch_header_hash}`
///
/// The hash is echoed back exactly as the client sent it.
pub async fn fetch_batch(
    State(state): State<AppState>,
    batch_header_hash: Result<Path<String>, PathRejection>,
) -> ApiResult<Response> {
    let tracker = state.metrics.track(FETCH_BATCH);

    let result = async {
        let Path(batch_header_hash) = batch_header_hash.map_err(|rejection| {
            debug!(error = %rejection.body_text(), "rejecting batch header path");
            ApiError::invalid_argument("invalid batch header hash")
        })?;
        let hash: BatchHeaderHash = batch_header_hash.parse().map_err(|e| {
            debug!(error = %e, "rejecting batch header hash");
            ApiError::invalid_argument("invalid batch header hash")
        })?;
        let (header, attestation) = state.blob_store.get_signed_batch(&hash).await?;
        let response = BatchResponse::new(batch_header_hash.as_str(), header, attestation);
        Ok::<_, ApiError>(cached(MAX_FEED_BLOB_AGE, response))
    }
    .await;

    tracker.finish(result)
}
