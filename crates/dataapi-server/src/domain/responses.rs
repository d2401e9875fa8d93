//! Wire response shapes.
//!
//! Every successful endpoint serializes exactly one of these; every failure
//! serializes [`ErrorResponse`]. Maps are `BTreeMap` so that repeated
//! requests produce byte-identical bodies.

use crate::domain::entities::{
    Attestation, BatchHeader, BlobHeader, BlobMetadata, BlobVerificationInfo,
};
use crate::domain::keys::OperatorId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sole error body across all endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of the root liveness endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
        }
    }
}

/// Projection of a stored blob metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobResponse {
    pub blob_header: BlobHeader,
    pub status: String,
    pub dispersed_at: u64,
    pub blob_size_bytes: u64,
}

impl From<BlobMetadata> for BlobResponse {
    fn from(metadata: BlobMetadata) -> Self {
        Self {
            status: metadata.blob_status.to_string(),
            dispersed_at: metadata.requested_at,
            blob_size_bytes: metadata.blob_size,
            blob_header: metadata.blob_header,
        }
    }
}

/// A batch header together with the attestation over it.
///
/// Only ever constructed from a header/attestation pair returned together by
/// the store, so a half-signed batch cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBatch {
    pub batch_header: BatchHeader,
    pub attestation: Attestation,
}

/// Batch lookup response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Echo of the hash used for the lookup.
    pub batch_header_hash: String,
    pub signed_batch: SignedBatch,
    /// Per-blob inclusion proofs.
    ///
    /// Not yet populated: always `None` and omitted from the body until the
    /// store can serve verification info.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_verification_infos: Option<Vec<BlobVerificationInfo>>,
}

impl BatchResponse {
    pub fn new(
        batch_header_hash: impl Into<String>,
        batch_header: BatchHeader,
        attestation: Attestation,
    ) -> Self {
        Self {
            batch_header_hash: batch_header_hash.into(),
            signed_batch: SignedBatch {
                batch_header,
                attestation,
            },
            blob_verification_infos: None,
        }
    }
}

/// One operator's stake within one quorum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorStake {
    pub quorum_id: String,
    pub operator_id: String,
    pub stake_amount: u64,
    pub stake_percentage: f64,
    /// 1-based rank by stake within the quorum.
    pub rank: usize,
}

/// Stake distribution keyed by quorum id, each list ranked by stake.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OperatorsStakeResponse {
    pub stake_ranked_operators: BTreeMap<String, Vec<OperatorStake>>,
}

impl OperatorsStakeResponse {
    /// Sum of `stake_amount` over every entry.
    pub fn total_stake(&self) -> u128 {
        self.stake_ranked_operators
            .values()
            .flatten()
            .map(|s| u128::from(s.stake_amount))
            .sum()
    }
}

/// Aggregate for one node software version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemverMetrics {
    pub semver: String,
    pub operators: u32,
    pub operator_ids: Vec<String>,
    /// Share of each quorum's stake running this version.
    pub stake_percentage: BTreeMap<u8, f64>,
}

/// Node software versions across the active operator set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SemverReportResponse {
    pub semver: BTreeMap<String, SemverMetrics>,
}

/// Result of probing one operator's public sockets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorPortCheck {
    pub operator_id: OperatorId,
    pub dispersal_socket: String,
    pub retrieval_socket: String,
    pub dispersal_online: bool,
    pub retrieval_online: bool,
    pub dispersal_status: String,
    pub retrieval_status: String,
}

/// Reachability report for one operator or the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperatorsReachabilityResponse {
    pub operators: Vec<OperatorPortCheck>,
}
