//! Request tracing middleware.
//!
//! Opens an `api_request` span per request carrying a UUIDv7 request id and
//! logs completion with status and latency. The root liveness path is polled
//! by load balancers and is passed through without a span.

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    response::Response,
};
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::{info, info_span, Instrument, Span};
use uuid::Uuid;

/// Response header echoing the generated request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tracing layer that creates spans for each request
#[derive(Clone, Default)]
pub struct RequestTracingLayer;

impl RequestTracingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestTracingLayer {
    type Service = RequestTracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestTracingService { inner }
    }
}

/// Tracing service
#[derive(Clone)]
pub struct RequestTracingService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for RequestTracingService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();

        if is_health_path(req.uri().path()) {
            return Box::pin(async move { inner.call(req).await });
        }

        let request_id = Uuid::now_v7();
        let span = info_span!(
            "api_request",
            http.method = %req.method(),
            http.target = %req.uri().path(),
            request_id = %request_id,
            http.status_code = tracing::field::Empty,
        );

        Box::pin(
            async move {
                let start = Instant::now();
                let mut result = inner.call(req).await;

                if let Ok(response) = &mut result {
                    let status = response.status();
                    Span::current().record("http.status_code", status.as_u16());
                    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                        response.headers_mut().insert(REQUEST_ID_HEADER, value);
                    }
                    info!(
                        status = status.as_u16(),
                        latency_ms = start.elapsed().as_millis() as u64,
                        "request completed"
                    );
                }

                result
            }
            .instrument(span),
        )
    }
}

fn is_health_path(path: &str) -> bool {
    path.is_empty() || path == "/"
}
