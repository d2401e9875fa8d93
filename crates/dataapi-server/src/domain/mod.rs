//! Domain types for the Data API.
//!
//! Configuration, identifiers, collaborator-owned records, wire responses and
//! the error taxonomy. Nothing here performs I/O.

pub mod config;
pub mod entities;
pub mod error;
pub mod keys;
pub mod responses;

// Re-exports for convenience
pub use config::{ConfigError, CorsConfig, DataApiConfig, LoggingConfig, ServerMode, TimeoutConfig};
pub use entities::{
    Attestation, BatchHeader, BlobCommitments, BlobHeader, BlobMetadata, BlobStatus,
    BlobVerificationInfo, PaymentMetadata,
};
pub use error::{ApiError, ApiResult, DataApiError, OperatorError, StoreError};
pub use keys::{BatchHeaderHash, BlobKey, IdentifierError, OperatorId};
pub use responses::*;
