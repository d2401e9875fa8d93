// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! Data API v2 - read-only HTTP query surface over blob, batch and operator
//! metadata.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        DATA API (v2)                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐                       ┌──────────────┐     │
//! │  │  HTTP /api/v2 │                       │   /metrics   │     │
//! │  │   Port 8080   │                       │  (optional)  │     │
//! │  └──────┬───────┘                       └──────────────┘     │
//! │         │                                                     │
//! │  ┌──────┴────────────────────────────────────────┐           │
//! │  │  Middleware: Tracing → CORS → Deadline → Body  │           │
//! │  └──────┬────────────────────────────────────────┘           │
//! │         │                                                     │
//! │  ┌──────┴────────────────────────────────────────┐           │
//! │  │  Handlers (RequestTracker per request)         │           │
//! │  └──────┬───────────────────────────┬────────────┘           │
//! └─────────┼───────────────────────────┼────────────────────────┘
//!           ▼                           ▼
//!   BlobMetadataStore             OperatorHandler
//! ```
//!
//! Handlers make exactly one collaborator call per request and translate the
//! result into a typed response or an [`ErrorResponse`] with a status drawn
//! from the [`ApiError`] taxonomy.
//!
//! # Usage
//!
//! ```ignore
//! use dataapi_server::{DataApiConfig, DataApiServer};
//!
//! let config = DataApiConfig::from_env()?;
//! dataapi_server::telemetry::init_tracing(&config.logging)?;
//! let server = DataApiServer::new(config, blob_store, operator_handler)?;
//! server.start().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod service;
pub mod telemetry;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-exports
pub use adapters::{InMemoryBlobMetadataStore, InMemoryOperatorHandler, OperatorRecord};
pub use domain::config::{CorsConfig, DataApiConfig, LoggingConfig, ServerMode, TimeoutConfig};
pub use domain::error::{ApiError, ApiResult, DataApiError, OperatorError, StoreError};
pub use domain::keys::{BatchHeaderHash, BlobKey, OperatorId};
pub use domain::responses::ErrorResponse;
pub use handlers::{build_router, AppState};
pub use middleware::{ApiMetrics, RequestOutcome};
pub use ports::{BlobMetadataStore, OperatorHandler};
pub use service::{DataApiServer, ShutdownHandle};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
