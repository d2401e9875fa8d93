//! Records owned by the storage and chain collaborators.
//!
//! The Data API never mutates these; it only projects them into response
//! shapes. Byte fields serialize as lowercase hex.

use crate::domain::keys::{BatchHeaderHash, BlobKey};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::collections::BTreeMap;
use std::fmt;

/// Serde helpers for `Vec<u8>` as lowercase hex.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)
    }
}

mod hex_bytes_list {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(&hex::encode(item))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .into_iter()
            .map(|s| hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom))
            .collect()
    }
}

mod hex_bytes_map {
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<u8, Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (quorum, bytes) in map {
            out.serialize_entry(quorum, &hex::encode(bytes))?;
        }
        out.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<u8, Vec<u8>>, D::Error> {
        BTreeMap::<u8, String>::deserialize(deserializer)?
            .into_iter()
            .map(|(q, s)| {
                hex::decode(s.trim_start_matches("0x"))
                    .map(|b| (q, b))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}

/// Lifecycle of a blob inside the disperser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlobStatus {
    Queued,
    Encoded,
    Certified,
    Failed,
    InsufficientSignatures,
}

impl BlobStatus {
    pub const ALL: [BlobStatus; 5] = [
        BlobStatus::Queued,
        BlobStatus::Encoded,
        BlobStatus::Certified,
        BlobStatus::Failed,
        BlobStatus::InsufficientSignatures,
    ];

    /// Display form used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlobStatus::Queued => "Queued",
            BlobStatus::Encoded => "Encoded",
            BlobStatus::Certified => "Certified",
            BlobStatus::Failed => "Failed",
            BlobStatus::InsufficientSignatures => "Insufficient Signatures",
        }
    }
}

impl fmt::Display for BlobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// KZG commitments over the blob data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobCommitments {
    #[serde(with = "hex_bytes")]
    pub commitment: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub length_commitment: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub length_proof: Vec<u8>,
    /// Length in symbols.
    pub length: u32,
}

/// Payment information attached by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMetadata {
    pub account_id: String,
    pub reservation_period: u32,
    /// Decimal string; cumulative payments exceed 64 bits.
    pub cumulative_payment: String,
}

/// Header a client submits alongside blob data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobHeader {
    pub blob_version: u16,
    pub quorum_numbers: Vec<u8>,
    pub blob_commitments: BlobCommitments,
    pub payment_metadata: PaymentMetadata,
}

impl BlobHeader {
    /// Content-derived blob key.
    ///
    /// Keccak-256 over the version, quorums, commitments and payment fields,
    /// each variable-length field prefixed by its big-endian u32 length.
    pub fn blob_key(&self) -> BlobKey {
        let mut hasher = Keccak256::new();
        hasher.update(self.blob_version.to_be_bytes());
        update_prefixed(&mut hasher, &self.quorum_numbers);
        update_prefixed(&mut hasher, &self.blob_commitments.commitment);
        update_prefixed(&mut hasher, &self.blob_commitments.length_commitment);
        update_prefixed(&mut hasher, &self.blob_commitments.length_proof);
        hasher.update(self.blob_commitments.length.to_be_bytes());
        update_prefixed(&mut hasher, self.payment_metadata.account_id.as_bytes());
        hasher.update(self.payment_metadata.reservation_period.to_be_bytes());
        update_prefixed(&mut hasher, self.payment_metadata.cumulative_payment.as_bytes());
        BlobKey::new(hasher.finalize().into())
    }
}

fn update_prefixed(hasher: &mut Keccak256, bytes: &[u8]) {
    hasher.update((bytes.len() as u32).to_be_bytes());
    hasher.update(bytes);
}

/// Stored metadata for one blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobMetadata {
    pub blob_header: BlobHeader,
    pub blob_status: BlobStatus,
    /// Unix nanoseconds at which the disperser accepted the blob.
    pub requested_at: u64,
    pub blob_size: u64,
    pub expiry: u64,
    pub num_retries: u32,
    pub updated_at: u64,
}

/// Header of a batch of certified blobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchHeader {
    #[serde(with = "crate::domain::entities::hex_array")]
    pub batch_root: [u8; 32],
    pub reference_block_number: u64,
}

impl BatchHeader {
    /// Keccak-256 over `batch_root || reference_block_number` (big-endian).
    pub fn hash(&self) -> BatchHeaderHash {
        let mut hasher = Keccak256::new();
        hasher.update(self.batch_root);
        hasher.update(self.reference_block_number.to_be_bytes());
        BatchHeaderHash::new(hasher.finalize().into())
    }
}

pub(crate) mod hex_array {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        crate::domain::keys::decode_identifier(&s).map_err(serde::de::Error::custom)
    }
}

/// Aggregate signature of the validator set over a batch header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// Unix nanoseconds at which signatures were aggregated.
    pub attested_at: u64,
    #[serde(with = "hex_bytes_list")]
    pub non_signer_pubkeys: Vec<Vec<u8>>,
    #[serde(with = "hex_bytes")]
    pub apk_g2: Vec<u8>,
    #[serde(with = "hex_bytes_map")]
    pub quorum_apks: BTreeMap<u8, Vec<u8>>,
    #[serde(with = "hex_bytes")]
    pub sigma: Vec<u8>,
    pub quorum_numbers: Vec<u8>,
    /// Signed stake percentage per quorum.
    pub quorum_results: BTreeMap<u8, u8>,
}

/// Inclusion proof of one blob inside a batch.
///
/// Declared for forward compatibility; not produced by the current store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobVerificationInfo {
    pub blob_key: BlobKey,
    pub blob_index: u32,
    #[serde(with = "hex_bytes")]
    pub inclusion_proof: Vec<u8>,
}
