//! Error taxonomy for the Data API.
//!
//! Three layers of errors live here:
//!
//! - [`StoreError`] and [`OperatorError`] are what collaborators hand back.
//!   Both carry a structured not-found variant so the handler never has to
//!   guess from message text.
//! - [`ApiError`] is the wire taxonomy. Every handler failure becomes exactly
//!   one of its variants, which in turn maps to one HTTP status and one
//!   [`ErrorResponse`](crate::domain::responses::ErrorResponse) body.
//! - [`DataApiError`] covers server lifecycle problems (bind, config, metrics)
//!   that never reach a client.

use crate::domain::responses::ErrorResponse;
use crate::middleware::metrics::RequestOutcome;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt;

/// Marker the operator handler historically embeds in error text when an
/// operator id is unknown.
pub const NOT_FOUND_MARKER: &str = "not found";

/// Errors returned by the blob metadata store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No record exists for the requested key.
    #[error("metadata not found: {0}")]
    NotFound(String),

    /// The store could not answer (unavailable, corrupt record, ...).
    #[error("{0}")]
    Internal(String),
}

/// Errors returned by the operator handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperatorError {
    /// The requested operator id is not part of the known operator set.
    #[error("operator not found: {0}")]
    NotFound(String),

    /// Chain read, subgraph query or probe failure.
    #[error("{0}")]
    Internal(String),
}

impl OperatorError {
    /// Whether this error denotes an unknown operator.
    ///
    /// The structured variant is authoritative. Handlers that only return
    /// [`OperatorError::Internal`] are still classified by looking for
    /// [`NOT_FOUND_MARKER`] in the message; that fallback is fragile and only
    /// exists until every operator handler reports `NotFound` directly.
    pub fn is_not_found(&self) -> bool {
        match self {
            OperatorError::NotFound(_) => true,
            OperatorError::Internal(msg) => msg.contains(NOT_FOUND_MARKER),
        }
    }
}

/// Wire-level error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed path or query parameter. Never reaches a collaborator.
    InvalidArgument(String),
    /// The collaborator reported that the entity does not exist.
    NotFound(String),
    /// Any other collaborator failure.
    Internal(String),
    /// Reserved endpoint with no backing implementation yet.
    Unimplemented(&'static str),
}

impl ApiError {
    /// Invalid argument error.
    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Self::InvalidArgument(details.into())
    }

    /// Not found error.
    pub fn not_found(details: impl Into<String>) -> Self {
        Self::NotFound(details.into())
    }

    /// Internal error.
    pub fn internal(details: impl Into<String>) -> Self {
        Self::Internal(details.into())
    }

    /// Placeholder failure for an endpoint that is reserved but not built.
    pub fn unimplemented(endpoint: &'static str) -> Self {
        Self::Unimplemented(endpoint)
    }

    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) | ApiError::Unimplemented(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Metrics outcome recorded for this error kind.
    pub fn outcome(&self) -> RequestOutcome {
        match self {
            ApiError::InvalidArgument(_) => RequestOutcome::InvalidArgument,
            ApiError::NotFound(_) => RequestOutcome::NotFound,
            ApiError::Internal(_) | ApiError::Unimplemented(_) => RequestOutcome::Failed,
        }
    }

    /// Client-safe message placed in the error body.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidArgument(details) => write!(f, "invalid argument: {}", details),
            ApiError::NotFound(details) => write!(f, "not found: {}", details),
            ApiError::Internal(details) => write!(f, "internal error: {}", details),
            ApiError::Unimplemented(endpoint) => write!(f, "{} unimplemented", endpoint),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            StoreError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

/// Result type for handler operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Server lifecycle errors (never serialized to clients).
#[derive(Debug, thiserror::Error)]
pub enum DataApiError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] crate::domain::config::ConfigError),

    /// Listener bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Error while serving connections
    #[error("server error: {0}")]
    Serve(String),

    /// Metrics registry error
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Tracing subscriber could not be installed
    #[error("telemetry error: {0}")]
    Telemetry(String),
}
