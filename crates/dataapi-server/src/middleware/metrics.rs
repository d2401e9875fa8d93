//! Prometheus metrics for the Data API.
//!
//! Every handler opens a [`RequestTracker`] on entry. The tracker records one
//! outcome and one latency observation when it is dropped, so early returns,
//! `?` propagation and cancelled futures are all counted.

use crate::domain::error::ApiResult;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use prometheus::{
    exponential_buckets, Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};

/// Classification of a finished request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Success,
    Failed,
    InvalidArgument,
    NotFound,
}

impl RequestOutcome {
    /// Value of the `status` label.
    pub fn as_label(&self) -> &'static str {
        match self {
            RequestOutcome::Success => "success",
            RequestOutcome::Failed => "failed",
            RequestOutcome::InvalidArgument => "invalid_args",
            RequestOutcome::NotFound => "not_found",
        }
    }
}

/// Data API metrics backed by a private registry.
pub struct ApiMetrics {
    registry: Registry,
    requests: IntCounterVec,
    latency_ms: HistogramVec,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("dataapi_requests_total", "Requests handled, by outcome and endpoint"),
            &["status", "method"],
        )?;
        let latency_ms = HistogramVec::new(
            HistogramOpts::new(
                "dataapi_request_latency_ms",
                "Handler latency in milliseconds",
            )
            .buckets(exponential_buckets(1.0, 2.0, 16)?),
            &["method"],
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(latency_ms.clone()))?;

        Ok(Self {
            registry,
            requests,
            latency_ms,
        })
    }

    /// Start tracking one request to `endpoint`.
    pub fn track(self: &Arc<Self>, endpoint: &'static str) -> RequestTracker {
        RequestTracker {
            metrics: Arc::clone(self),
            endpoint,
            start: Instant::now(),
            outcome: None,
        }
    }

    pub fn record(&self, endpoint: &str, outcome: RequestOutcome) {
        self.requests
            .with_label_values(&[outcome.as_label(), endpoint])
            .inc();
    }

    pub fn observe_latency(&self, endpoint: &str, latency_ms: f64) {
        self.latency_ms
            .with_label_values(&[endpoint])
            .observe(latency_ms);
    }

    /// Current value of the request counter for one label pair.
    pub fn request_count(&self, endpoint: &str, outcome: RequestOutcome) -> u64 {
        self.requests
            .with_label_values(&[outcome.as_label(), endpoint])
            .get()
    }

    /// Number of latency observations for one endpoint.
    pub fn latency_sample_count(&self, endpoint: &str) -> u64 {
        self.latency_ms
            .with_label_values(&[endpoint])
            .get_sample_count()
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Drop guard recording the outcome and latency of one request.
///
/// A tracker dropped without [`finish`](RequestTracker::finish) counts as a
/// failed request: the handler future was cancelled mid-flight.
pub struct RequestTracker {
    metrics: Arc<ApiMetrics>,
    endpoint: &'static str,
    start: Instant,
    outcome: Option<RequestOutcome>,
}

impl RequestTracker {
    /// Classify `result`, log failures, and hand the result back unchanged.
    pub fn finish<T>(mut self, result: ApiResult<T>) -> ApiResult<T> {
        match &result {
            Ok(_) => self.outcome = Some(RequestOutcome::Success),
            Err(err) => {
                let outcome = err.outcome();
                match outcome {
                    RequestOutcome::Failed => {
                        error!(endpoint = self.endpoint, error = %err, "request failed")
                    }
                    _ => warn!(endpoint = self.endpoint, error = %err, "request rejected"),
                }
                self.outcome = Some(outcome);
            }
        }
        result
    }
}

impl Drop for RequestTracker {
    fn drop(&mut self) {
        let outcome = self.outcome.unwrap_or(RequestOutcome::Failed);
        self.metrics.record(self.endpoint, outcome);
        let latency_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        self.metrics.observe_latency(self.endpoint, latency_ms);
    }
}

/// Router serving `GET /metrics` for the Prometheus listener.
pub fn metrics_router(metrics: Arc<ApiMetrics>) -> Router {
    Router::new()
        .route("/metrics", get(render_metrics))
        .with_state(metrics)
}

async fn render_metrics(State(metrics): State<Arc<ApiMetrics>>) -> Response {
    match metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
