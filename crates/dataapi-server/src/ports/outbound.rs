//! Outbound ports for the Data API.
//!
//! The handler set reads through these two traits and nothing else. Each
//! method is a single awaited lookup; dropping the returned future abandons
//! the lookup, which is how request cancellation reaches the collaborator.

use crate::domain::entities::{Attestation, BatchHeader, BlobMetadata};
use crate::domain::error::{OperatorError, StoreError};
use crate::domain::keys::{BatchHeaderHash, BlobKey, OperatorId};
use crate::domain::responses::{
    OperatorsReachabilityResponse, OperatorsStakeResponse, SemverReportResponse,
};
use async_trait::async_trait;

/// Blob and batch metadata persistence - outbound port.
#[async_trait]
pub trait BlobMetadataStore: Send + Sync {
    /// Metadata for one blob.
    ///
    /// Returns [`StoreError::NotFound`] when no blob has this key.
    async fn get_blob_metadata(&self, blob_key: &BlobKey) -> Result<BlobMetadata, StoreError>;

    /// Header and attestation of one batch, always returned together.
    ///
    /// Returns [`StoreError::NotFound`] when either half is missing.
    async fn get_signed_batch(
        &self,
        batch_header_hash: &BatchHeaderHash,
    ) -> Result<(BatchHeader, Attestation), StoreError>;
}

/// Operator stake, node info and reachability - outbound port.
#[async_trait]
pub trait OperatorHandler: Send + Sync {
    /// Stake distribution for one operator, or for all when `operator_id` is `None`.
    async fn get_operators_stake(
        &self,
        operator_id: Option<&OperatorId>,
    ) -> Result<OperatorsStakeResponse, OperatorError>;

    /// Node software versions across the active operator set.
    async fn scan_operators_host_info(&self) -> Result<SemverReportResponse, OperatorError>;

    /// Probe dispersal and retrieval sockets for one operator, or for all.
    ///
    /// Returns [`OperatorError::NotFound`] when `operator_id` is unknown.
    async fn probe_operator_hosts(
        &self,
        operator_id: Option<&OperatorId>,
    ) -> Result<OperatorsReachabilityResponse, OperatorError>;
}
