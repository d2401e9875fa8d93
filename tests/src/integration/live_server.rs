//! # Live server
//!
//! Binds an ephemeral port and talks to the server with `reqwest`, covering
//! what the in-process router cannot: real connections, CORS as a browser
//! sees it, the metrics listener and graceful shutdown.

#[cfg(test)]
mod tests {
    use super::super::SeededNetwork;
    use dataapi_server::domain::responses::{BlobResponse, OperatorsReachabilityResponse};
    use dataapi_server::{DataApiConfig, DataApiError, ServerMode, ShutdownHandle};
    use reqwest::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, ORIGIN};
    use reqwest::StatusCode;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    struct RunningServer {
        addr: SocketAddr,
        shutdown: ShutdownHandle,
        task: JoinHandle<Result<(), DataApiError>>,
    }

    impl RunningServer {
        async fn spawn(network: &SeededNetwork, config: DataApiConfig) -> Self {
            let server = Arc::new(network.server(config));
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let shutdown = server.shutdown_handle();
            let task = tokio::spawn(async move { server.serve(listener).await });
            Self {
                addr,
                shutdown,
                task,
            }
        }

        fn url(&self, path: &str) -> String {
            format!("http://{}{}", self.addr, path)
        }

        async fn stop(self) {
            self.shutdown.shutdown();
            let result = tokio::time::timeout(Duration::from_secs(5), self.task)
                .await
                .expect("server did not stop")
                .expect("server task panicked");
            assert!(result.is_ok());
        }
    }

    #[tokio::test]
    async fn test_blob_over_http() {
        let network = SeededNetwork::new();
        let server = RunningServer::spawn(&network, DataApiConfig::default()).await;
        let client = reqwest::Client::new();

        let (key, status, size) = network.blob_keys[1];
        let response = client
            .get(server.url(&format!("/api/v2/blob/blob/0x{}", key)))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CACHE_CONTROL], "max-age=300");

        let blob: BlobResponse = response.json().await.unwrap();
        assert_eq!(blob.status, status.to_string());
        assert_eq!(blob.blob_size_bytes, size);

        server.stop().await;
    }

    #[tokio::test]
    async fn test_debug_mode_accepts_any_origin() {
        let network = SeededNetwork::new();
        let server = RunningServer::spawn(&network, DataApiConfig::default()).await;

        let response = reqwest::Client::new()
            .get(server.url("/api/v2/operators/reachability"))
            .header(ORIGIN, "http://localhost:3000")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        let report: OperatorsReachabilityResponse = response.json().await.unwrap();
        assert_eq!(report.operators.len(), network.operator_ids.len());

        server.stop().await;
    }

    #[tokio::test]
    async fn test_release_mode_enforces_allow_list() {
        let network = SeededNetwork::new();
        let mut config = DataApiConfig {
            server_mode: ServerMode::Release,
            ..DataApiConfig::default()
        };
        config.cors.allowed_origins = vec!["https://blobs.example.org".to_string()];
        let server = RunningServer::spawn(&network, config).await;
        let client = reqwest::Client::new();

        let allowed = client
            .get(server.url("/api/v2/operators/nodeinfo"))
            .header(ORIGIN, "https://blobs.example.org")
            .send()
            .await
            .unwrap();
        assert_eq!(
            allowed.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://blobs.example.org"
        );

        let foreign = client
            .get(server.url("/api/v2/operators/nodeinfo"))
            .header(ORIGIN, "https://elsewhere.example.net")
            .send()
            .await
            .unwrap();
        assert!(foreign
            .headers()
            .get(ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());

        server.stop().await;
    }

    #[tokio::test]
    async fn test_metrics_listener_reports_requests() {
        let network = SeededNetwork::new();
        let api_addr = free_addr().await;
        let metrics_addr = free_addr().await;
        let config = DataApiConfig {
            socket_addr: api_addr,
            metrics_addr: Some(metrics_addr),
            ..DataApiConfig::default()
        };
        let server = Arc::new(network.server(config));
        let shutdown = server.shutdown_handle();
        let task = tokio::spawn({
            let server = Arc::clone(&server);
            async move { server.start().await }
        });

        let client = reqwest::Client::new();
        let feed = retry_get(&client, &format!("http://{}/api/v2/blob/blob/feed", api_addr)).await;
        assert_eq!(feed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let exposition = retry_get(&client, &format!("http://{}/metrics", metrics_addr))
            .await
            .text()
            .await
            .unwrap();
        assert!(exposition.contains("dataapi_requests_total"));
        assert!(exposition.contains("method=\"FetchBlobFeed\""));

        shutdown.shutdown();
        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    /// Reserve an ephemeral port and release it for the server to bind.
    async fn free_addr() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    }

    async fn retry_get(client: &reqwest::Client, url: &str) -> reqwest::Response {
        for _ in 0..50 {
            if let Ok(response) = client.get(url).send().await {
                return response;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("{url} never became reachable");
    }
}
