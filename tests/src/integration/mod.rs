//! # Integration fixtures
//!
//! A small seeded network: a handful of blobs in every lifecycle state, two
//! signed batches, one unsigned batch header and three operators.

pub mod http_contract;
pub mod live_server;

use dataapi_server::adapters::{InMemoryBlobMetadataStore, InMemoryOperatorHandler};
use dataapi_server::domain::entities::BlobStatus;
use dataapi_server::test_utils::{
    operator_record, sample_attestation, sample_batch_header, sample_blob_metadata,
};
use dataapi_server::{BatchHeaderHash, BlobKey, DataApiConfig, DataApiServer, OperatorId};
use std::sync::Arc;

/// Seeded collaborators plus the keys needed to query them.
pub struct SeededNetwork {
    pub store: Arc<InMemoryBlobMetadataStore>,
    pub operators: Arc<InMemoryOperatorHandler>,
    pub blob_keys: Vec<(BlobKey, BlobStatus, u64)>,
    pub signed_batches: Vec<BatchHeaderHash>,
    pub unsigned_batch: BatchHeaderHash,
    pub operator_ids: Vec<OperatorId>,
}

impl SeededNetwork {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryBlobMetadataStore::new());

        let blob_keys = BlobStatus::ALL
            .iter()
            .enumerate()
            .map(|(i, &status)| {
                let size = 1024 * (i as u64 + 1);
                let key = store.put_blob_metadata(sample_blob_metadata(i as u8 + 10, status, size));
                (key, status, size)
            })
            .collect();

        let signed_batches = (100..102)
            .map(|n| store.put_signed_batch(sample_batch_header(n), sample_attestation()))
            .collect();
        let unsigned_batch = store.put_batch_header(sample_batch_header(999));

        let operators = Arc::new(InMemoryOperatorHandler::with_operators([
            operator_record(0xa1, Some("0.9.1"), &[(0, 4_000), (1, 1_000)], true),
            operator_record(0xb2, Some("0.9.0"), &[(0, 2_500), (2, 700)], true),
            operator_record(0xc3, None, &[(1, 3_000), (2, 300)], false),
        ]));
        let operator_ids = operators.operator_ids();

        Self {
            store,
            operators,
            blob_keys,
            signed_batches,
            unsigned_batch,
            operator_ids,
        }
    }

    pub fn server(&self, config: DataApiConfig) -> DataApiServer {
        DataApiServer::new(config, self.store.clone(), self.operators.clone())
            .expect("valid test configuration")
    }
}

impl Default for SeededNetwork {
    fn default() -> Self {
        Self::new()
    }
}
