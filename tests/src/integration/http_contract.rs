//! # HTTP contract
//!
//! Drives the fully layered router in-process and checks the observable
//! contract of every endpoint: status codes, error bodies, cache headers,
//! determinism and metrics accounting.

#[cfg(test)]
mod tests {
    use super::super::SeededNetwork;
    use axum::body::{to_bytes, Body, Bytes};
    use axum::http::{header, HeaderMap, Request, StatusCode};
    use axum::Router;
    use dataapi_server::adapters::InMemoryOperatorHandler;
    use dataapi_server::domain::responses::{
        BatchResponse, BlobResponse, OperatorsStakeResponse,
    };
    use dataapi_server::handlers::{
        FETCH_BATCH_FEED, FETCH_BLOB, FETCH_BLOB_FEED, FETCH_METRICS_OVERVIEW,
        FETCH_METRICS_THROUGHPUT, FETCH_NON_SIGNERS, FETCH_OPERATORS_STAKE,
    };
    use dataapi_server::test_utils::CountingStore;
    use dataapi_server::{
        DataApiConfig, DataApiServer, ErrorResponse, RequestOutcome, StoreError,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    const LIFECYCLE: [&str; 5] = [
        "Queued",
        "Encoded",
        "Certified",
        "Failed",
        "Insufficient Signatures",
    ];

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    async fn get(router: &Router, uri: &str) -> (StatusCode, HeaderMap, Bytes) {
        let response = router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body)
    }

    fn cache_control(headers: &HeaderMap) -> Option<&str> {
        headers
            .get(header::CACHE_CONTROL)
            .map(|v| v.to_str().unwrap())
    }

    fn server_over(store: Arc<CountingStore>) -> DataApiServer {
        DataApiServer::new(
            DataApiConfig::default(),
            store,
            Arc::new(InMemoryOperatorHandler::new()),
        )
        .unwrap()
    }

    // =============================================================================
    // BLOB AND BATCH LOOKUPS
    // =============================================================================

    #[tokio::test]
    async fn test_every_seeded_blob_resolves() {
        let network = SeededNetwork::new();
        let router = network.server(DataApiConfig::default()).router();

        for (key, status, size) in &network.blob_keys {
            let (code, headers, body) = get(&router, &format!("/api/v2/blob/blob/{}", key)).await;
            assert_eq!(code, StatusCode::OK);
            assert_eq!(cache_control(&headers), Some("max-age=300"));

            let blob: BlobResponse = serde_json::from_slice(&body).unwrap();
            assert!(LIFECYCLE.contains(&blob.status.as_str()));
            assert_eq!(blob.status, status.to_string());
            assert_eq!(blob.blob_size_bytes, *size);
        }
    }

    #[tokio::test]
    async fn test_unknown_blob_404_vs_store_failure_500() {
        let uri = format!("/api/v2/blob/blob/0xdeadbeef{}", "00".repeat(28));

        let empty = server_over(Arc::new(CountingStore::new())).router();
        let (status, _, body) = get(&empty, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(err.error.starts_with("not found"));

        let broken = server_over(Arc::new(CountingStore::failing(StoreError::Internal(
            "table scan throttled".into(),
        ))))
        .router();
        let (status, headers, body) = get(&broken, &uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(cache_control(&headers).is_none());
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(err.error.contains("table scan throttled"));
    }

    #[tokio::test]
    async fn test_malformed_identifiers_never_reach_store() {
        let store = Arc::new(CountingStore::new());
        let router = server_over(store.clone()).router();

        let odd = "a".repeat(63);
        let short = "ab".repeat(31);
        for bad in ["not-hex", odd.as_str(), short.as_str()] {
            let (status, _, _) = get(&router, &format!("/api/v2/blob/blob/{}", bad)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "blob {bad}");
            let (status, _, _) = get(&router, &format!("/api/v2/batch/batch/{}", bad)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "batch {bad}");
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_batch_lookup_requires_attestation() {
        let network = SeededNetwork::new();
        let router = network.server(DataApiConfig::default()).router();

        for hash in &network.signed_batches {
            let (status, headers, body) =
                get(&router, &format!("/api/v2/batch/batch/{}", hash)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(cache_control(&headers), Some("max-age=300"));
            let batch: BatchResponse = serde_json::from_slice(&body).unwrap();
            assert_eq!(batch.batch_header_hash, hash.to_hex());
            assert_eq!(batch.signed_batch.batch_header.hash(), *hash);
        }

        let uri = format!("/api/v2/batch/batch/{}", network.unsigned_batch);
        let (status, headers, _) = get(&router, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(cache_control(&headers).is_none());
    }

    #[tokio::test]
    async fn test_extractor_failures_use_error_body_and_metrics() {
        let network = SeededNetwork::new();
        let server = network.server(DataApiConfig::default());
        let router = server.router();
        let metrics = server.metrics();

        let (status, _, body) = get(&router, "/api/v2/blob/blob/%FF%FE").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(err.error.contains("invalid blob key"));
        assert_eq!(
            metrics.request_count(FETCH_BLOB, RequestOutcome::InvalidArgument),
            1
        );

        let id = network.operator_ids[0];
        let uri = format!("/api/v2/operators/stake?operator_id={}&operator_id={}", id, id);
        let (status, headers, body) = get(&router, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache_control(&headers), Some("max-age=3600"));
        let stake: OperatorsStakeResponse = serde_json::from_slice(&body).unwrap();
        assert!(stake.total_stake() > 0);
        assert_eq!(
            metrics.request_count(FETCH_OPERATORS_STAKE, RequestOutcome::Success),
            1
        );
    }

    // =============================================================================
    // DETERMINISM AND CACHING
    // =============================================================================

    #[tokio::test]
    async fn test_repeated_reads_are_byte_identical() {
        let network = SeededNetwork::new();
        let router = network.server(DataApiConfig::default()).router();

        let uris = [
            format!("/api/v2/blob/blob/{}", network.blob_keys[2].0),
            format!("/api/v2/batch/batch/{}", network.signed_batches[0]),
            "/api/v2/operators/stake".to_string(),
            "/api/v2/operators/nodeinfo".to_string(),
            "/api/v2/operators/reachability".to_string(),
        ];

        for uri in &uris {
            let (_, _, first) = get(&router, uri).await;
            let (_, _, second) = get(&router, uri).await;
            assert_eq!(first, second, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_cache_control_per_endpoint_class() {
        let network = SeededNetwork::new();
        let router = network.server(DataApiConfig::default()).router();
        let operator = network.operator_ids[0];

        let expected = [
            (format!("/api/v2/blob/blob/{}", network.blob_keys[0].0), "max-age=300"),
            (format!("/api/v2/batch/batch/{}", network.signed_batches[1]), "max-age=300"),
            ("/api/v2/operators/stake".to_string(), "max-age=3600"),
            (format!("/api/v2/operators/stake?operator_id={}", operator), "max-age=3600"),
            ("/api/v2/operators/nodeinfo".to_string(), "max-age=60"),
            (format!("/api/v2/operators/reachability?operator_id={}", operator), "max-age=60"),
        ];

        for (uri, max_age) in &expected {
            let (status, headers, _) = get(&router, uri).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(cache_control(&headers), Some(*max_age), "{uri}");
        }

        let (status, headers, body) = get(&router, "/").await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(cache_control(&headers).is_none());
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
            serde_json::json!({"status": "OK"})
        );
    }

    // =============================================================================
    // OPERATORS
    // =============================================================================

    #[tokio::test]
    async fn test_stake_total_matches_per_operator_queries() {
        let network = SeededNetwork::new();
        let router = network.server(DataApiConfig::default()).router();

        let (_, _, body) = get(&router, "/api/v2/operators/stake").await;
        let all: OperatorsStakeResponse = serde_json::from_slice(&body).unwrap();

        let mut individual = 0u128;
        for id in &network.operator_ids {
            let uri = format!("/api/v2/operators/stake?operator_id=0x{}", id);
            let (status, _, body) = get(&router, &uri).await;
            assert_eq!(status, StatusCode::OK);
            let one: OperatorsStakeResponse = serde_json::from_slice(&body).unwrap();
            individual += one.total_stake();
        }

        assert_eq!(all.total_stake(), individual);
        assert_eq!(all.total_stake(), 11_500);
    }

    #[tokio::test]
    async fn test_reachability_unknown_operator() {
        let network = SeededNetwork::new();
        let router = network.server(DataApiConfig::default()).router();

        let uri = format!("/api/v2/operators/reachability?operator_id={}", "0f".repeat(32));
        let (status, _, body) = get(&router, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(err.error.contains("not found"));
    }

    // =============================================================================
    // RESERVED ENDPOINTS
    // =============================================================================

    #[tokio::test]
    async fn test_reserved_endpoints_fail_once_each() {
        let network = SeededNetwork::new();
        let server = network.server(DataApiConfig::default());
        let router = server.router();
        let metrics = server.metrics();

        let reserved = [
            ("/api/v2/blob/blob/feed", FETCH_BLOB_FEED),
            ("/api/v2/batch/batch/feed", FETCH_BATCH_FEED),
            ("/api/v2/operators/non-signers", FETCH_NON_SIGNERS),
            ("/api/v2/metrics/overview", FETCH_METRICS_OVERVIEW),
            ("/api/v2/metrics/throughput", FETCH_METRICS_THROUGHPUT),
        ];

        for (uri, endpoint) in reserved {
            let (status, _, body) = get(&router, uri).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
            assert!(err.error.contains("unimplemented"));
            assert_eq!(metrics.request_count(endpoint, RequestOutcome::Failed), 1);
            assert_eq!(metrics.request_count(endpoint, RequestOutcome::Success), 0);
        }
    }
}
