//! Whole-request deadline.
//!
//! When the deadline fires the inner future is dropped, which cancels any
//! in-flight collaborator call, and the client receives a 504 with the usual
//! error body.

use crate::domain::responses::ErrorResponse;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::time::Duration;
use tokio::time::timeout;
use tower::{Layer, Service};
use tracing::warn;

/// Deadline layer
#[derive(Clone, Copy)]
pub struct RequestDeadlineLayer {
    deadline: Duration,
}

impl RequestDeadlineLayer {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }
}

impl<S> Layer<S> for RequestDeadlineLayer {
    type Service = RequestDeadlineService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestDeadlineService {
            inner,
            deadline: self.deadline,
        }
    }
}

/// Deadline service
#[derive(Clone)]
pub struct RequestDeadlineService<S> {
    inner: S,
    deadline: Duration,
}

impl<S> Service<Request<Body>> for RequestDeadlineService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let deadline = self.deadline;
        let path = req.uri().path().to_string();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match timeout(deadline, inner.call(req)).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(path = %path, timeout_ms = deadline.as_millis() as u64, "request deadline exceeded");
                    Ok(deadline_response(deadline))
                }
            }
        })
    }
}

fn deadline_response(deadline: Duration) -> Response {
    let body = ErrorResponse {
        error: format!("request exceeded {}ms deadline", deadline.as_millis()),
    };
    (StatusCode::GATEWAY_TIMEOUT, Json(body)).into_response()
}
