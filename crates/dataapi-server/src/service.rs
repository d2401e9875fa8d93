//! Data API server - main entry point.
//!
//! Owns the configuration, the shared handler state and the shutdown signal.
//! The HTTP API and the optional Prometheus listener share one shutdown.

use crate::domain::config::DataApiConfig;
use crate::domain::error::DataApiError;
use crate::handlers::{build_router, AppState};
use crate::middleware::{
    create_cors_layer, metrics_router, ApiMetrics, RequestDeadlineLayer, RequestTracingLayer,
};
use crate::ports::outbound::{BlobMetadataStore, OperatorHandler};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::timeout::RequestBodyTimeoutLayer;
use tracing::{error, info};

/// Data API server
pub struct DataApiServer {
    config: DataApiConfig,
    state: AppState,
    shutdown_tx: Arc<watch::Sender<bool>>,
}

/// Cloneable trigger for graceful shutdown.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Stop accepting connections and let in-flight requests finish.
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }
}

impl DataApiServer {
    /// Create a new server over the given collaborators
    pub fn new(
        config: DataApiConfig,
        blob_store: Arc<dyn BlobMetadataStore>,
        operators: Arc<dyn OperatorHandler>,
    ) -> Result<Self, DataApiError> {
        config.validate()?;

        let metrics = Arc::new(ApiMetrics::new()?);
        let state = AppState::new(blob_store, operators, metrics);
        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            config,
            state,
            shutdown_tx: Arc::new(shutdown_tx),
        })
    }

    pub fn config(&self) -> &DataApiConfig {
        &self.config
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<ApiMetrics> {
        Arc::clone(&self.state.metrics)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: Arc::clone(&self.shutdown_tx),
        }
    }

    /// Handler router with the full middleware stack attached.
    pub fn router(&self) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(RequestTracingLayer::new())
            .layer(create_cors_layer(
                &self.config.cors,
                self.config.server_mode,
            ))
            .layer(RequestDeadlineLayer::new(self.config.timeouts.write))
            .layer(RequestBodyTimeoutLayer::new(self.config.timeouts.read));

        build_router(self.state.clone()).layer(middleware)
    }

    /// Serve the API on an already bound listener until shutdown.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), DataApiError> {
        let addr = listener
            .local_addr()
            .map_err(|e| DataApiError::Bind(e.to_string()))?;
        info!(
            addr = %addr,
            mode = ?self.config.server_mode,
            "Data API listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(self.shutdown_signal())
            .await
            .map_err(|e| DataApiError::Serve(e.to_string()))?;

        info!(addr = %addr, "Data API stopped");
        Ok(())
    }

    /// Bind the configured addresses and serve until shutdown.
    pub async fn start(&self) -> Result<(), DataApiError> {
        let listener = bind(self.config.socket_addr).await?;

        let metrics_task = match self.config.metrics_addr {
            Some(addr) => Some(self.spawn_metrics_listener(bind(addr).await?)),
            None => None,
        };

        let result = self.serve(listener).await;

        if let Some(task) = metrics_task {
            self.shutdown_handle().shutdown();
            match task.await {
                Ok(Err(e)) => error!(error = %e, "metrics listener failed"),
                Err(e) => error!(error = %e, "metrics listener panicked"),
                Ok(Ok(())) => {}
            }
        }

        result
    }

    fn spawn_metrics_listener(
        &self,
        listener: TcpListener,
    ) -> JoinHandle<Result<(), DataApiError>> {
        let router = metrics_router(self.metrics());
        let shutdown = self.shutdown_signal();

        tokio::spawn(async move {
            if let Ok(addr) = listener.local_addr() {
                info!(addr = %addr, "metrics listener started");
            }
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
                .map_err(|e| DataApiError::Serve(e.to_string()))
        })
    }

    fn shutdown_signal(&self) -> impl std::future::Future<Output = ()> + Send + 'static {
        let mut rx = self.shutdown_tx.subscribe();
        async move {
            let _ = rx.wait_for(|stopped| *stopped).await;
        }
    }
}

async fn bind(addr: SocketAddr) -> Result<TcpListener, DataApiError> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| DataApiError::Bind(format!("{}: {}", addr, e)))
}
