//! Error taxonomy shared by every component of the distribution engine.
//!
//! Proof mismatches are absent: verification reports a plain `bool`. Every
//! [`EngineError`] variant describes input that cannot be interpreted, so
//! retrying with the same input fails identically. Filesystem and JSON
//! failures are kept apart in [`FileError`] so the core error stays
//! comparable.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the encoding, tree and plan layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The heir identifier is not a non-negative integer below `2^256`.
    #[error("invalid heir identifier `{value}`: {reason}")]
    InvalidIdentifier { value: String, reason: &'static str },
    /// A share value does not fit the 16-bit element type.
    #[error("share at position {index} is out of range: {value}")]
    InvalidShare { index: usize, value: i64 },
    /// The tree builder received zero leaves.
    #[error("no leaves supplied")]
    EmptyInput,
    /// A hash, proof element or address is not a well-formed fixed-length value.
    #[error("invalid encoding for {field}: {reason}")]
    InvalidEncoding { field: &'static str, reason: String },
    /// A distribution plan must name at least one asset.
    #[error("distribution plan has no assets")]
    NoAssets,
    /// An asset entry is neither a 20-byte address nor the native placeholder.
    #[error("invalid asset address `{value}`")]
    InvalidAddress { value: String },
    /// The same asset appears twice in the asset list.
    #[error("asset {address} is listed more than once (positions {first} and {second})")]
    DuplicateAsset {
        address: String,
        first: usize,
        second: usize,
    },
    /// A heir's share vector does not have one entry per asset.
    #[error("heir {heir_id} has {got} shares but the plan has {expected} assets")]
    ShareVectorLength {
        heir_id: String,
        expected: usize,
        got: usize,
    },
    /// The shares assigned for one asset add up to more than 100%.
    #[error("asset {asset_index} is over-allocated: {total_bps} bps assigned")]
    OverAllocated { asset_index: usize, total_bps: u32 },
    /// The same heir identifier appears twice.
    #[error("heir {heir_id} appears more than once")]
    DuplicateHeir { heir_id: String },
    /// The plan exceeds the configured heir cap.
    #[error("plan has {got} heirs, limit is {max}")]
    TooManyHeirs { max: usize, got: usize },
    /// The plan names more assets than a vault can hold.
    #[error("plan has {got} assets, limit is {max}")]
    TooManyAssets { max: usize, got: usize },
    /// A percentage string could not be parsed.
    #[error("invalid percentage `{value}`")]
    InvalidPercentage { value: String },
    /// The engine configuration failed validation.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: &'static str },
}

impl EngineError {
    pub(crate) fn encoding(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidEncoding {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn identifier(value: impl Into<String>, reason: &'static str) -> Self {
        EngineError::InvalidIdentifier {
            value: value.into(),
            reason,
        }
    }
}

/// Result alias used throughout the crate.
pub type EngineResult<T> = core::result::Result<T, EngineError>;

/// Failures while reading or writing plan, proof and config files.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl FileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FileError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        FileError::Json {
            path: path.into(),
            source,
        }
    }
}
