//! Middleware stack for the Data API.
//!
//! Layer order: Request → Tracing → CORS → Deadline → BodyTimeout → Handler
//!
//! Metrics are not a layer: each handler owns a [`RequestTracker`] so that the
//! recorded outcome reflects the handler's own error classification.

pub mod cors;
pub mod metrics;
pub mod timeout;
pub mod tracing;

pub use cors::create_cors_layer;
pub use metrics::{metrics_router, ApiMetrics, RequestOutcome, RequestTracker};
pub use timeout::RequestDeadlineLayer;
pub use tracing::{RequestTracingLayer, REQUEST_ID_HEADER};
