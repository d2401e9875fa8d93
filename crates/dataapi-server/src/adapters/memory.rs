//! In-memory collaborators.
//!
//! Back local runs and tests with the same contracts the production store and
//! operator handler honour: structured not-found, a signed batch only when
//! both halves exist, and stake rankings derived from one consistent snapshot.

use crate::domain::entities::{Attestation, BatchHeader, BlobMetadata};
use crate::domain::error::{OperatorError, StoreError};
use crate::domain::keys::{BatchHeaderHash, BlobKey, OperatorId};
use crate::domain::responses::{
    OperatorPortCheck, OperatorStake, OperatorsReachabilityResponse, OperatorsStakeResponse,
    SemverMetrics, SemverReportResponse,
};
use crate::ports::outbound::{BlobMetadataStore, OperatorHandler};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Semver bucket for operators whose node did not answer the version probe.
pub const UNREACHABLE_SEMVER: &str = "unreachable";

/// Blob and batch metadata held in process memory.
#[derive(Default)]
pub struct InMemoryBlobMetadataStore {
    blobs: RwLock<HashMap<BlobKey, BlobMetadata>>,
    batch_headers: RwLock<HashMap<BatchHeaderHash, BatchHeader>>,
    attestations: RwLock<HashMap<BatchHeaderHash, Attestation>>,
}

impl InMemoryBlobMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store blob metadata under its content-derived key.
    pub fn put_blob_metadata(&self, metadata: BlobMetadata) -> BlobKey {
        let key = metadata.blob_header.blob_key();
        self.blobs.write().insert(key, metadata);
        key
    }

    /// Store a batch header; the batch is not servable until attested.
    pub fn put_batch_header(&self, header: BatchHeader) -> BatchHeaderHash {
        let hash = header.hash();
        self.batch_headers.write().insert(hash, header);
        hash
    }

    pub fn put_attestation(&self, batch_header_hash: BatchHeaderHash, attestation: Attestation) {
        self.attestations
            .write()
            .insert(batch_header_hash, attestation);
    }

    /// Store a header and its attestation together.
    pub fn put_signed_batch(&self, header: BatchHeader, attestation: Attestation) -> BatchHeaderHash {
        let hash = self.put_batch_header(header);
        self.put_attestation(hash, attestation);
        hash
    }
}

#[async_trait]
impl BlobMetadataStore for InMemoryBlobMetadataStore {
    async fn get_blob_metadata(&self, blob_key: &BlobKey) -> Result<BlobMetadata, StoreError> {
        self.blobs
            .read()
            .get(blob_key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("blob {}", blob_key)))
    }

    async fn get_signed_batch(
        &self,
        batch_header_hash: &BatchHeaderHash,
    ) -> Result<(BatchHeader, Attestation), StoreError> {
        let header = self
            .batch_headers
            .read()
            .get(batch_header_hash)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("batch header {}", batch_header_hash)))?;
        let attestation = self
            .attestations
            .read()
            .get(batch_header_hash)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("attestation {}", batch_header_hash)))?;
        Ok((header, attestation))
    }
}

/// Everything the operator handler knows about one operator.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorRecord {
    pub id: OperatorId,
    pub dispersal_socket: String,
    pub retrieval_socket: String,
    /// Reported node version, `None` when the node did not answer.
    pub semver: Option<String>,
    /// Stake per quorum. Quorums with zero stake are ignored.
    pub stakes: BTreeMap<u8, u64>,
    pub dispersal_online: bool,
    pub retrieval_online: bool,
}

/// Operator set held in process memory.
#[derive(Default)]
pub struct InMemoryOperatorHandler {
    operators: RwLock<BTreeMap<OperatorId, OperatorRecord>>,
}

impl InMemoryOperatorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operators(records: impl IntoIterator<Item = OperatorRecord>) -> Self {
        let handler = Self::new();
        for record in records {
            handler.upsert(record);
        }
        handler
    }

    /// Insert or replace an operator.
    pub fn upsert(&self, record: OperatorRecord) {
        self.operators.write().insert(record.id, record);
    }

    pub fn operator_ids(&self) -> Vec<OperatorId> {
        self.operators.read().keys().copied().collect()
    }
}

/// Total stake per quorum over the given operators.
fn quorum_totals<'a>(records: impl Iterator<Item = &'a OperatorRecord>) -> BTreeMap<u8, u128> {
    let mut totals = BTreeMap::new();
    for record in records {
        for (&quorum, &amount) in &record.stakes {
            *totals.entry(quorum).or_insert(0u128) += u128::from(amount);
        }
    }
    totals
}

fn percentage(part: u128, total: u128) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Rank every operator in every quorum by stake, largest first.
///
/// Ties are broken by operator id so the ordering is stable.
fn rank_stakes(operators: &BTreeMap<OperatorId, OperatorRecord>) -> OperatorsStakeResponse {
    let totals = quorum_totals(operators.values());
    let mut response = OperatorsStakeResponse::default();

    for (&quorum, &total) in &totals {
        let mut entries: Vec<(&OperatorId, u64)> = operators
            .values()
            .filter_map(|r| match r.stakes.get(&quorum) {
                Some(&amount) if amount > 0 => Some((&r.id, amount)),
                _ => None,
            })
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let ranked = entries
            .into_iter()
            .enumerate()
            .map(|(i, (id, amount))| OperatorStake {
                quorum_id: quorum.to_string(),
                operator_id: id.to_hex(),
                stake_amount: amount,
                stake_percentage: percentage(u128::from(amount), total),
                rank: i + 1,
            })
            .collect::<Vec<_>>();

        if !ranked.is_empty() {
            response
                .stake_ranked_operators
                .insert(quorum.to_string(), ranked);
        }
    }

    response
}

fn port_check(record: &OperatorRecord) -> OperatorPortCheck {
    let status = |online: bool, socket: &str| {
        if online {
            format!("{} is reachable", socket)
        } else {
            format!("{} is unreachable", socket)
        }
    };
    OperatorPortCheck {
        operator_id: record.id,
        dispersal_socket: record.dispersal_socket.clone(),
        retrieval_socket: record.retrieval_socket.clone(),
        dispersal_online: record.dispersal_online,
        retrieval_online: record.retrieval_online,
        dispersal_status: status(record.dispersal_online, &record.dispersal_socket),
        retrieval_status: status(record.retrieval_online, &record.retrieval_socket),
    }
}

#[async_trait]
impl OperatorHandler for InMemoryOperatorHandler {
    async fn get_operators_stake(
        &self,
        operator_id: Option<&OperatorId>,
    ) -> Result<OperatorsStakeResponse, OperatorError> {
        let operators = self.operators.read();
        let mut response = rank_stakes(&operators);

        if let Some(id) = operator_id {
            let id = id.to_hex();
            for entries in response.stake_ranked_operators.values_mut() {
                entries.retain(|s| s.operator_id == id);
            }
            response
                .stake_ranked_operators
                .retain(|_, entries| !entries.is_empty());
        }

        debug!(
            quorums = response.stake_ranked_operators.len(),
            "computed operator stake distribution"
        );
        Ok(response)
    }

    async fn scan_operators_host_info(&self) -> Result<SemverReportResponse, OperatorError> {
        let operators = self.operators.read();
        let totals = quorum_totals(operators.values());

        let mut by_version: BTreeMap<String, Vec<&OperatorRecord>> = BTreeMap::new();
        for record in operators.values() {
            let version = record
                .semver
                .clone()
                .unwrap_or_else(|| UNREACHABLE_SEMVER.to_string());
            by_version.entry(version).or_default().push(record);
        }

        let semver = by_version
            .into_iter()
            .map(|(version, records)| {
                let version_totals = quorum_totals(records.iter().copied());
                let stake_percentage = totals
                    .iter()
                    .map(|(&quorum, &total)| {
                        let part = version_totals.get(&quorum).copied().unwrap_or(0);
                        (quorum, percentage(part, total))
                    })
                    .collect();
                let metrics = SemverMetrics {
                    semver: version.clone(),
                    operators: records.len() as u32,
                    operator_ids: records.iter().map(|r| r.id.to_hex()).collect(),
                    stake_percentage,
                };
                (version, metrics)
            })
            .collect();

        Ok(SemverReportResponse { semver })
    }

    async fn probe_operator_hosts(
        &self,
        operator_id: Option<&OperatorId>,
    ) -> Result<OperatorsReachabilityResponse, OperatorError> {
        let operators = self.operators.read();
        let checks = match operator_id {
            Some(id) => {
                let record = operators
                    .get(id)
                    .ok_or_else(|| OperatorError::NotFound(id.to_hex()))?;
                vec![port_check(record)]
            }
            None => operators.values().map(port_check).collect(),
        };
        Ok(OperatorsReachabilityResponse { operators: checks })
    }
}
