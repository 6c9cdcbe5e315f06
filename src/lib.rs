//! Merkle-based inheritance distribution engine.
//!
//! An owner splits a set of assets among heirs in basis points, commits the
//! whole split as a single Merkle root, and hands each heir a proof file. A
//! heir later proves their share against the published root without the rest
//! of the plan being revealed.
//!
//! The crate is organised bottom-up:
//!
//! | Module | Role |
//! |--------|------|
//! | [`hash`] | Keccak-256, the 32-byte [`Hash`] value and sorted-pair hashing. |
//! | [`leaf`] | Packs `(heir_id, shares_bps)` and hashes it into a leaf. |
//! | [`merkle`] | Builds the tree, extracts proofs and verifies them. |
//! | [`entitlement`] | Estimates amounts owed at current balances. |
//! | [`gate`] | Classifies vault facts into a claim decision. |
//! | [`plan`] | Validates and generates plans, reads and writes plan files. |
//! | [`config`] | Packing, ordering and plan policy knobs. |
//!
//! Every operation is pure and synchronous. The byte layout of leaves, the
//! hash function and the pairing rule must stay identical to the on-chain
//! verifier; changing any of them invalidates every proof ever issued.

pub mod config;
pub mod entitlement;
pub mod errors;
pub mod gate;
pub mod hash;
pub mod leaf;
pub mod merkle;
pub mod plan;
pub mod utils;

pub use config::{EngineConfig, EngineConfigBuilder, Profile};
pub use entitlement::{entitlement, entitlement_table, AssetBalance, AssetEntitlement};
pub use errors::{EngineError, EngineResult, FileError};
pub use gate::{can_claim, classify, evaluate, ClaimFacts, ClaimPermission, DistributionState};
pub use hash::Hash;
pub use leaf::{encode_leaf, HeirId, LeafEncoder, SharePacking};
pub use merkle::{build_tree, verify, LeafOrdering, MerkleTree, TreeOutput};
pub use plan::{Address, DistributionPlan, HeirProofFile, HeirRecord, PlanFile, PlanRequest};
