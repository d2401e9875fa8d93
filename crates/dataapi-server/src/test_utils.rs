//! Fixtures and stand-in collaborators for tests.
//!
//! Enabled for unit tests and, through the `test-utils` feature, for the
//! workspace integration tests.

use crate::adapters::memory::{InMemoryBlobMetadataStore, OperatorRecord};
use crate::domain::entities::{
    Attestation, BatchHeader, BlobCommitments, BlobHeader, BlobMetadata, BlobStatus,
    PaymentMetadata,
};
use crate::domain::error::{OperatorError, StoreError};
use crate::domain::keys::{BatchHeaderHash, BlobKey, OperatorId};
use crate::domain::responses::{
    OperatorsReachabilityResponse, OperatorsStakeResponse, SemverReportResponse,
};
use crate::ports::outbound::{BlobMetadataStore, OperatorHandler};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Blob header whose content, and therefore key, is determined by `seed`.
pub fn sample_blob_header(seed: u8) -> BlobHeader {
    BlobHeader {
        blob_version: 0,
        quorum_numbers: vec![0, 1],
        blob_commitments: BlobCommitments {
            commitment: vec![seed; 64],
            length_commitment: vec![seed.wrapping_add(1); 128],
            length_proof: vec![seed.wrapping_add(2); 128],
            length: 16,
        },
        payment_metadata: PaymentMetadata {
            account_id: format!("0x{:040x}", seed),
            reservation_period: 0,
            cumulative_payment: "1000000000".to_string(),
        },
    }
}

pub fn sample_blob_metadata(seed: u8, status: BlobStatus, size: u64) -> BlobMetadata {
    BlobMetadata {
        blob_header: sample_blob_header(seed),
        blob_status: status,
        requested_at: 1_700_000_000_000_000_000 + u64::from(seed),
        blob_size: size,
        expiry: 1_700_086_400,
        num_retries: 0,
        updated_at: 1_700_000_000_500_000_000,
    }
}

pub fn sample_batch_header(reference_block_number: u64) -> BatchHeader {
    BatchHeader {
        batch_root: [0x5a; 32],
        reference_block_number,
    }
}

pub fn sample_attestation() -> Attestation {
    Attestation {
        attested_at: 1_700_000_010_000_000_000,
        non_signer_pubkeys: vec![vec![0x11; 64]],
        apk_g2: vec![0x22; 128],
        quorum_apks: BTreeMap::from([(0, vec![0x33; 64]), (1, vec![0x44; 64])]),
        sigma: vec![0x55; 64],
        quorum_numbers: vec![0, 1],
        quorum_results: BTreeMap::from([(0, 100), (1, 80)]),
    }
}

/// Operator id with every byte set to `n`.
pub fn operator_id(n: u8) -> OperatorId {
    OperatorId::new([n; 32])
}

pub fn operator_record(
    n: u8,
    semver: Option<&str>,
    stakes: &[(u8, u64)],
    online: bool,
) -> OperatorRecord {
    OperatorRecord {
        id: operator_id(n),
        dispersal_socket: format!("10.0.0.{}:32005", n),
        retrieval_socket: format!("10.0.0.{}:32004", n),
        semver: semver.map(str::to_string),
        stakes: stakes.iter().copied().collect(),
        dispersal_online: online,
        retrieval_online: online,
    }
}

/// Metadata store that counts calls and can be told to fail every lookup.
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryBlobMetadataStore,
    failure: Option<StoreError>,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every lookup returns `error`.
    pub fn failing(error: StoreError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn inner(&self) -> &InMemoryBlobMetadataStore {
        &self.inner
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BlobMetadataStore for CountingStore {
    async fn get_blob_metadata(&self, blob_key: &BlobKey) -> Result<BlobMetadata, StoreError> {
        self.enter()?;
        self.inner.get_blob_metadata(blob_key).await
    }

    async fn get_signed_batch(
        &self,
        batch_header_hash: &BatchHeaderHash,
    ) -> Result<(BatchHeader, Attestation), StoreError> {
        self.enter()?;
        self.inner.get_signed_batch(batch_header_hash).await
    }
}

/// Metadata store whose lookups never complete.
pub struct StallingStore;

#[async_trait]
impl BlobMetadataStore for StallingStore {
    async fn get_blob_metadata(&self, _blob_key: &BlobKey) -> Result<BlobMetadata, StoreError> {
        std::future::pending().await
    }

    async fn get_signed_batch(
        &self,
        _batch_header_hash: &BatchHeaderHash,
    ) -> Result<(BatchHeader, Attestation), StoreError> {
        std::future::pending().await
    }
}

/// Operator handler that fails every call with the same error.
pub struct FailingOperatorHandler {
    error: OperatorError,
}

impl FailingOperatorHandler {
    pub fn new(error: OperatorError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl OperatorHandler for FailingOperatorHandler {
    async fn get_operators_stake(
        &self,
        _operator_id: Option<&OperatorId>,
    ) -> Result<OperatorsStakeResponse, OperatorError> {
        Err(self.error.clone())
    }

    async fn scan_operators_host_info(&self) -> Result<SemverReportResponse, OperatorError> {
        Err(self.error.clone())
    }

    async fn probe_operator_hosts(
        &self,
        _operator_id: Option<&OperatorId>,
    ) -> Result<OperatorsReachabilityResponse, OperatorError> {
        Err(self.error.clone())
    }
}
