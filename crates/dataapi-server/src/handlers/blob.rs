//! Blob endpoints.

use super::{cached, unimplemented_endpoint, AppState, FETCH_BLOB, FETCH_BLOB_FEED, MAX_FEED_BLOB_AGE};
use crate::domain::error::{ApiError, ApiResult};
use crate::domain::keys::BlobKey;
use crate::domain::responses::BlobResponse;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::Response;

/// `GET /blob/blob/feed`
pub async fn fetch_blob_feed(State(state): State<AppState>) -> ApiResult<Response> {
    unimplemented_endpoint(&state, FETCH_BLOB_FEED)
}

/// `GET /blob/blob/{blob_key}`
pub async fn fetch_blob(
    State(state): State<AppState>,
    blob_key: Result<Path<String>, PathRejection>,
) -> ApiResult<Response> {
    let tracker = state.metrics.track(FETCH_BLOB);

    let result = async {
        let Path(blob_key) = blob_key.map_err(|rejection| {
            ApiError::invalid_argument(format!("invalid blob key: {}", rejection.body_text()))
        })?;
        let key: BlobKey = blob_key
            .parse()
            .map_err(|e| ApiError::invalid_argument(format!("invalid blob key: {}", e)))?;
        let metadata = state.blob_store.get_blob_metadata(&key).await?;
        Ok::<_, ApiError>(cached(MAX_FEED_BLOB_AGE, BlobResponse::from(metadata)))
    }
    .await;

    tracker.finish(result)
}
