//! Leaf encoder.
//!
//! A leaf commits to exactly `(heir_id, shares_bps)`; display names never
//! reach the hash. The packed layout is a wire-format contract with the
//! on-chain verifier:
//!
//! * `heir_id` as a 32-byte big-endian word (`uint256`).
//! * each share, in array order, as a big-endian integer of the element width
//!   selected by [`SharePacking`]. No length prefix is written for the array.
//!
//! The leaf is `keccak256` of that byte string.

mod heir_id;

pub use heir_id::{HeirId, HEIR_ID_BYTES};

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};
use crate::hash::{Hash, Hasher};

/// Width of one share element under [`SharePacking::Compact`] (`uint16`).
pub const SHARE_ELEMENT_BYTES: usize = 2;

/// Width of one share element under [`SharePacking::AbiWord`].
pub const ABI_WORD_BYTES: usize = 32;

/// Byte layout used for the share array inside the packed leaf payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SharePacking {
    /// Each share takes two big-endian bytes.
    #[default]
    Compact,
    /// Each share is left-padded to a 32-byte word, as Solidity's
    /// `abi.encodePacked` does for array elements.
    AbiWord,
}

impl SharePacking {
    /// Number of bytes written per share element.
    pub const fn element_width(self) -> usize {
        match self {
            SharePacking::Compact => SHARE_ELEMENT_BYTES,
            SharePacking::AbiWord => ABI_WORD_BYTES,
        }
    }

    /// Total payload length for a share vector of `share_count` elements.
    pub const fn payload_len(self, share_count: usize) -> usize {
        HEIR_ID_BYTES + share_count * self.element_width()
    }
}

/// Packs `(heir_id, shares_bps)` into the byte string that is hashed into a leaf.
pub fn pack_leaf(heir_id: &HeirId, shares_bps: &[u16], packing: SharePacking) -> Vec<u8> {
    let mut out = Vec::with_capacity(packing.payload_len(shares_bps.len()));
    out.extend_from_slice(&heir_id.to_be_bytes());
    let pad = packing.element_width() - SHARE_ELEMENT_BYTES;
    for share in shares_bps {
        out.extend(core::iter::repeat(0u8).take(pad));
        out.extend_from_slice(&share.to_be_bytes());
    }
    out
}

/// Leaf for `(heir_id, shares_bps)` under the default compact packing.
pub fn encode_leaf(heir_id: &HeirId, shares_bps: &[u16]) -> Hash {
    LeafEncoder::default().encode(heir_id, shares_bps)
}

/// Validates an untyped share vector into 16-bit elements.
///
/// Values above 10000 are accepted here; over-allocation is a plan-level
/// concern.
pub fn shares_from_values(values: &[i64]) -> EngineResult<Vec<u16>> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            u16::try_from(value).map_err(|_| EngineError::InvalidShare { index, value })
        })
        .collect()
}

/// Leaf encoder bound to one packing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeafEncoder {
    packing: SharePacking,
}

impl LeafEncoder {
    pub const fn new(packing: SharePacking) -> Self {
        Self { packing }
    }

    pub const fn packing(&self) -> SharePacking {
        self.packing
    }

    /// Hashes the packed payload without materialising it.
    pub fn encode(&self, heir_id: &HeirId, shares_bps: &[u16]) -> Hash {
        let mut hasher = Hasher::new();
        hasher.update(&heir_id.to_be_bytes());
        let pad = [0u8; ABI_WORD_BYTES - SHARE_ELEMENT_BYTES];
        let pad = &pad[..self.packing.element_width() - SHARE_ELEMENT_BYTES];
        for share in shares_bps {
            hasher.update(pad);
            hasher.update(&share.to_be_bytes());
        }
        hasher.finalize()
    }

    /// Like [`LeafEncoder::encode`] but for untyped shares.
    pub fn encode_values(&self, heir_id: &HeirId, shares: &[i64]) -> EngineResult<Hash> {
        let shares_bps = shares_from_values(shares)?;
        Ok(self.encode(heir_id, &shares_bps))
    }
}
