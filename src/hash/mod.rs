//! Hashing primitives shared by the leaf encoder, tree builder and verifier.
//!
//! Every digest in the engine is a Keccak-256 output. The external on-chain
//! verifier repeats the same two operations, so both are frozen here:
//!
//! * [`keccak256`] – plain Keccak-256 (the pre-standard padding, not SHA3-256).
//! * [`hash_sorted_pair`] – parent derivation for two children: the byte-wise
//!   smaller child is absorbed first, then the larger one. Proofs therefore
//!   carry no left/right position bits.
//!
//! [`Hash`] renders as `0x` followed by 64 lowercase hex characters and parses
//! the same text with or without the prefix.

mod keccak;

pub use keccak::{hash_sorted_pair, keccak256, Hasher};

use core::fmt;
use core::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{EngineError, EngineResult};

/// Size in bytes of every digest produced by the engine.
pub const DIGEST_SIZE: usize = 32;

/// 32-byte digest used for leaves, inner nodes, proof elements and roots.
///
/// Ordering is byte-wise lexicographic, which is the order used by
/// sorted-pair hashing.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash {
    bytes: [u8; DIGEST_SIZE],
}

impl Hash {
    /// The all-zero digest.
    pub const ZERO: Hash = Hash {
        bytes: [0u8; DIGEST_SIZE],
    };

    /// Constructs a digest from raw bytes.
    pub const fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self { bytes }
    }

    /// Interprets a byte slice as a digest, failing unless it is exactly
    /// [`DIGEST_SIZE`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> EngineResult<Self> {
        let bytes: [u8; DIGEST_SIZE] = bytes.try_into().map_err(|_| {
            EngineError::encoding(
                "hash",
                format!("expected {DIGEST_SIZE} bytes, got {}", bytes.len()),
            )
        })?;
        Ok(Self { bytes })
    }

    /// Parses `0x`-prefixed or bare hexadecimal text.
    pub fn from_hex(text: &str) -> EngineResult<Self> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != DIGEST_SIZE * 2 {
            return Err(EngineError::encoding(
                "hash",
                format!(
                    "expected {} hex characters, got {}",
                    DIGEST_SIZE * 2,
                    digits.len()
                ),
            ));
        }
        let mut bytes = [0u8; DIGEST_SIZE];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|err| EngineError::encoding("hash", err.to_string()))?;
        Ok(Self { bytes })
    }

    /// Returns the canonical byte representation of the digest.
    pub const fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.bytes
    }

    /// Consumes the digest and returns the underlying byte array.
    pub const fn into_bytes(self) -> [u8; DIGEST_SIZE] {
        self.bytes
    }

    /// Lowercase hex without the `0x` prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl From<[u8; DIGEST_SIZE]> for Hash {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Hash> for [u8; DIGEST_SIZE] {
    fn from(hash: Hash) -> Self {
        hash.into_bytes()
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash(0x{})", self.to_hex())
    }
}

impl FromStr for Hash {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HashVisitor;

        impl Visitor<'_> for HashVisitor {
            type Value = Hash;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 32-byte hex string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Hash, E> {
                Hash::from_hex(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(HashVisitor)
    }
}
