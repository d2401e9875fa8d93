//! Hex-encoded 32-byte identifiers used in paths and query strings.
//!
//! All three identifiers share one wire rule: an optional `0x`/`0X` prefix,
//! exactly 64 hex digits, rendered back as lowercase hex without a prefix.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length in bytes of every identifier in this module.
pub const IDENTIFIER_LEN: usize = 32;

/// Why a hex identifier could not be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IdentifierError {
    #[error("empty identifier")]
    Empty,
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Decode a 32-byte identifier from hex.
pub fn decode_identifier(input: &str) -> Result<[u8; IDENTIFIER_LEN], IdentifierError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(IdentifierError::Empty);
    }

    let bytes = hex::decode(digits)?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| IdentifierError::InvalidLength {
            expected: IDENTIFIER_LEN,
            actual,
        })
}

macro_rules! hex_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; IDENTIFIER_LEN]);

        impl $name {
            pub const fn new(bytes: [u8; IDENTIFIER_LEN]) -> Self {
                Self(bytes)
            }

            pub fn as_bytes(&self) -> &[u8; IDENTIFIER_LEN] {
                &self.0
            }

            /// Lowercase hex without prefix.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                decode_identifier(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

hex_identifier!(
    /// Content-derived key of a blob (Keccak-256 of its header).
    BlobKey
);

hex_identifier!(
    /// Keccak-256 hash of a batch header.
    BatchHeaderHash
);

hex_identifier!(
    /// Operator identifier as registered on chain.
    OperatorId
);
