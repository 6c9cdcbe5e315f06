//! Distribution plans.
//!
//! A [`DistributionPlan`] is produced once per planning session from an
//! ordered asset list and the heir records. Generation validates both lists,
//! encodes one leaf per heir, builds the tree and attaches each heir's proof.
//! The result is immutable; changing anything means generating a new plan,
//! which yields a new root.
//!
//! Validation performed before any hashing:
//!
//! * assets: at least one, each a non-zero 20-byte address (the native
//!   placeholder included), no repeats, at most `max_assets`;
//! * heirs: at least one, at most `max_heirs`, one share per asset, unique
//!   identifiers when `reject_duplicate_heirs` is set, and no asset assigned
//!   more than 10000 bps when `enforce_allocation` is set.

mod asset;
mod files;
mod shares;

pub use asset::{Address, AssetKind, ADDRESS_BYTES, NATIVE_PLACEHOLDER};
pub use files::{
    heir_file_name, read_heir_file, read_plan_file, read_plan_request, sanitize_file_stem,
    write_plan_files,
    HeirProofFile, PlanFile, WrittenFiles, PLAN_FILE_NAME,
};
pub use shares::{percent_to_bps, percents_to_bps};

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::entitlement::BPS_DENOMINATOR;
use crate::errors::{EngineError, EngineResult};
use crate::hash::Hash;
use crate::leaf::{shares_from_values, HeirId, LeafEncoder, SharePacking};
use crate::merkle::{self, LeafOrdering, MerkleTree};

/// One heir as declared by the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeirRecord {
    pub heir_id: HeirId,
    /// Free text, never hashed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// One entry per plan asset, in asset order.
    pub shares_bps: Vec<u16>,
}

impl HeirRecord {
    pub fn new(heir_id: impl Into<HeirId>, shares_bps: Vec<u16>) -> Self {
        Self {
            heir_id: heir_id.into(),
            name: None,
            shares_bps,
        }
    }

    /// Attaches a display name; blank names are dropped.
    pub fn with_name(mut self, name: impl AsRef<str>) -> Self {
        let name = name.as_ref().trim();
        self.name = (!name.is_empty()).then(|| name.to_string());
        self
    }
}

/// A heir inside a generated plan, with its leaf and proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedHeir {
    pub heir_id: HeirId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub shares_bps: Vec<u16>,
    pub leaf: Hash,
    pub proof: Vec<Hash>,
}

/// Committed distribution plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionPlan {
    root: Hash,
    assets: Vec<Address>,
    heirs: Vec<PlannedHeir>,
    packing: SharePacking,
    ordering: LeafOrdering,
}

impl DistributionPlan {
    /// Validates the inputs, encodes every heir and builds the tree.
    pub fn generate(
        assets: &[Address],
        heirs: Vec<HeirRecord>,
        config: &EngineConfig,
    ) -> EngineResult<Self> {
        config.validate()?;
        validate_assets(assets, config)?;
        validate_heirs(assets.len(), &heirs, config)?;

        let encoder = config.leaf_encoder();
        let leaves = encode_leaves(&encoder, &heirs);
        let tree = MerkleTree::build_with(&leaves, config.ordering)?;
        let root = tree.root();

        let heirs = heirs
            .into_iter()
            .zip(leaves)
            .zip(tree.proofs())
            .map(|((record, leaf), proof)| PlannedHeir {
                heir_id: record.heir_id,
                name: record.name,
                shares_bps: record.shares_bps,
                leaf,
                proof,
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            heirs = heirs.len(),
            assets = assets.len(),
            depth = tree.depth(),
            %root,
            "distribution plan generated"
        );

        Ok(Self {
            root,
            assets: assets.to_vec(),
            heirs,
            packing: config.packing,
            ordering: config.ordering,
        })
    }

    /// Parses a JSON-level request and generates the plan.
    pub fn from_request(request: &PlanRequest, config: &EngineConfig) -> EngineResult<Self> {
        let assets = parse_assets(&request.tokens, request.include_native)?;
        let heirs = request
            .heirs
            .iter()
            .map(HeirRequest::to_record)
            .collect::<EngineResult<Vec<_>>>()?;
        Self::generate(&assets, heirs, config)
    }

    pub fn root(&self) -> Hash {
        self.root
    }

    pub fn assets(&self) -> &[Address] {
        &self.assets
    }

    pub fn heirs(&self) -> &[PlannedHeir] {
        &self.heirs
    }

    /// First heir with the given identifier.
    pub fn heir(&self, heir_id: &HeirId) -> Option<&PlannedHeir> {
        self.heirs.iter().find(|heir| heir.heir_id == *heir_id)
    }

    /// Leaves in heir order.
    pub fn leaves(&self) -> Vec<Hash> {
        self.heirs.iter().map(|heir| heir.leaf).collect()
    }

    pub fn packing(&self) -> SharePacking {
        self.packing
    }

    pub fn ordering(&self) -> LeafOrdering {
        self.ordering
    }

    /// Re-derives every leaf and checks every proof against the root.
    pub fn verify_all(&self) -> bool {
        let encoder = LeafEncoder::new(self.packing);
        self.heirs.iter().all(|heir| {
            encoder.encode(&heir.heir_id, &heir.shares_bps) == heir.leaf
                && merkle::verify(&heir.leaf, &heir.proof, &self.root)
        })
    }
}

fn encode_leaves(encoder: &LeafEncoder, heirs: &[HeirRecord]) -> Vec<Hash> {
    #[cfg(feature = "parallel")]
    let leaves: Vec<Hash> = if crate::utils::parallelism_enabled() {
        use rayon::prelude::*;
        let chunk = crate::utils::preferred_chunk_size(heirs.len());
        heirs
            .par_iter()
            .with_min_len(chunk)
            .map(|heir| encoder.encode(&heir.heir_id, &heir.shares_bps))
            .collect()
    } else {
        heirs
            .iter()
            .map(|heir| encoder.encode(&heir.heir_id, &heir.shares_bps))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let leaves: Vec<Hash> = heirs
        .iter()
        .map(|heir| encoder.encode(&heir.heir_id, &heir.shares_bps))
        .collect();
    leaves
}

/// Parses an asset list, optionally prepending the native placeholder.
pub fn parse_assets<S: AsRef<str>>(tokens: &[S], include_native: bool) -> EngineResult<Vec<Address>> {
    let mut assets = Vec::with_capacity(tokens.len() + usize::from(include_native));
    if include_native {
        assets.push(Address::NATIVE);
    }
    for token in tokens {
        assets.push(Address::parse(token.as_ref())?);
    }
    Ok(assets)
}

fn validate_assets(assets: &[Address], config: &EngineConfig) -> EngineResult<()> {
    if assets.is_empty() {
        return Err(EngineError::NoAssets);
    }
    if assets.len() > config.max_assets {
        return Err(EngineError::TooManyAssets {
            max: config.max_assets,
            got: assets.len(),
        });
    }
    let mut seen: HashMap<Address, usize> = HashMap::with_capacity(assets.len());
    for (index, asset) in assets.iter().enumerate() {
        if asset.is_zero() {
            return Err(EngineError::InvalidAddress {
                value: asset.to_string(),
            });
        }
        if let Some(first) = seen.insert(*asset, index) {
            return Err(EngineError::DuplicateAsset {
                address: asset.to_string(),
                first,
                second: index,
            });
        }
    }
    Ok(())
}

fn validate_heirs(asset_count: usize, heirs: &[HeirRecord], config: &EngineConfig) -> EngineResult<()> {
    if heirs.is_empty() {
        return Err(EngineError::EmptyInput);
    }
    if heirs.len() > config.max_heirs {
        return Err(EngineError::TooManyHeirs {
            max: config.max_heirs,
            got: heirs.len(),
        });
    }

    let mut ids = HashSet::with_capacity(heirs.len());
    for heir in heirs {
        if heir.shares_bps.len() != asset_count {
            return Err(EngineError::ShareVectorLength {
                heir_id: heir.heir_id.to_string(),
                expected: asset_count,
                got: heir.shares_bps.len(),
            });
        }
        if !ids.insert(heir.heir_id) && config.reject_duplicate_heirs {
            return Err(EngineError::DuplicateHeir {
                heir_id: heir.heir_id.to_string(),
            });
        }
    }

    for asset_index in 0..asset_count {
        let total_bps: u32 = heirs
            .iter()
            .map(|heir| u32::from(heir.shares_bps[asset_index]))
            .sum();
        if total_bps > u32::from(BPS_DENOMINATOR) {
            if config.enforce_allocation {
                return Err(EngineError::OverAllocated {
                    asset_index,
                    total_bps,
                });
            }
            tracing::warn!(asset_index, total_bps, "asset is over-allocated");
        }
    }
    Ok(())
}

/// JSON input for plan generation.
///
/// ```json
/// {
///   "tokens": ["0x..."],
///   "includeNative": true,
///   "heirs": [
///     { "heirId": 1, "name": "Alice", "sharesBps": [3000, 4000] },
///     { "heirId": 2, "shares": ["70", "60"] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default)]
    pub include_native: bool,
    pub heirs: Vec<HeirRequest>,
}

/// One heir of a [`PlanRequest`]. `sharesBps` wins when both share forms
/// are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeirRequest {
    pub heir_id: HeirId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares_bps: Option<Vec<i64>>,
    /// Percent strings such as `"12.5"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<Vec<String>>,
}

impl HeirRequest {
    /// Resolves the share vector into a validated [`HeirRecord`].
    pub fn to_record(&self) -> EngineResult<HeirRecord> {
        let shares_bps = match (&self.shares_bps, &self.shares) {
            (Some(bps), _) => shares_from_values(bps)?,
            (None, Some(percents)) => percents_to_bps(percents)?,
            (None, None) => Vec::new(),
        };
        let record = HeirRecord::new(self.heir_id, shares_bps);
        Ok(match &self.name {
            Some(name) => record.with_name(name),
            None => record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(byte: u8) -> Address {
        Address::from_bytes([byte; ADDRESS_BYTES])
    }

    fn two_heirs() -> Vec<HeirRecord> {
        vec![
            HeirRecord::new(1u64, vec![3000, 4000]).with_name("Alice"),
            HeirRecord::new(2u64, vec![7000, 6000]),
        ]
    }

    #[test]
    fn two_heir_plan_matches_golden_root() {
        let plan = DistributionPlan::generate(
            &[token(0x11), token(0x22)],
            two_heirs(),
            &EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(
            plan.root().to_string(),
            "0xfc70c490f473f96111c7ca98a2a3215f51c43e847de4441e1db475918659c729"
        );
        assert!(plan.verify_all());
        assert_eq!(plan.heirs()[0].name.as_deref(), Some("Alice"));
        assert_eq!(plan.heirs()[1].proof, vec![plan.heirs()[0].leaf]);
    }

    #[test]
    fn names_do_not_affect_leaves() {
        let assets = [token(0x11), token(0x22)];
        let config = EngineConfig::default();
        let named = DistributionPlan::generate(&assets, two_heirs(), &config).unwrap();
        let anonymous = two_heirs()
            .into_iter()
            .map(|mut heir| {
                heir.name = None;
                heir
            })
            .collect();
        let anonymous = DistributionPlan::generate(&assets, anonymous, &config).unwrap();
        assert_eq!(named.root(), anonymous.root());
    }

    #[test]
    fn asset_list_is_validated() {
        let config = EngineConfig::default();
        let heirs = vec![HeirRecord::new(1u64, vec![100])];
        assert_eq!(
            DistributionPlan::generate(&[], vec![HeirRecord::new(1u64, vec![])], &config),
            Err(EngineError::NoAssets)
        );
        assert!(matches!(
            DistributionPlan::generate(&[Address::ZERO], heirs.clone(), &config),
            Err(EngineError::InvalidAddress { .. })
        ));
        let err = DistributionPlan::generate(
            &[token(0x11), token(0x11)],
            vec![HeirRecord::new(1u64, vec![1, 1])],
            &config,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::DuplicateAsset {
                first: 0,
                second: 1,
                ..
            }
        ));
    }

    #[test]
    fn heir_list_is_validated() {
        let config = EngineConfig::default();
        let assets = [token(0x11)];
        assert_eq!(
            DistributionPlan::generate(&assets, vec![], &config),
            Err(EngineError::EmptyInput)
        );
        assert!(matches!(
            DistributionPlan::generate(&assets, vec![HeirRecord::new(1u64, vec![1, 2])], &config),
            Err(EngineError::ShareVectorLength {
                expected: 1,
                got: 2,
                ..
            })
        ));
        let over = vec![
            HeirRecord::new(1u64, vec![6000]),
            HeirRecord::new(2u64, vec![5000]),
        ];
        assert_eq!(
            DistributionPlan::generate(&assets, over.clone(), &config),
            Err(EngineError::OverAllocated {
                asset_index: 0,
                total_bps: 11_000
            })
        );
        let lenient = EngineConfig::builder().enforce_allocation(false).build().unwrap();
        assert!(DistributionPlan::generate(&assets, over, &lenient).is_ok());
    }

    #[test]
    fn duplicate_heirs_follow_policy() {
        let assets = [token(0x11)];
        let twins = vec![
            HeirRecord::new(5u64, vec![1000]),
            HeirRecord::new(5u64, vec![1000]),
        ];
        let plan = DistributionPlan::generate(&assets, twins.clone(), &EngineConfig::default()).unwrap();
        assert_eq!(plan.heirs()[0].leaf, plan.heirs()[1].leaf);
        assert!(plan.verify_all());

        let strict = EngineConfig::builder().reject_duplicate_heirs(true).build().unwrap();
        assert!(matches!(
            DistributionPlan::generate(&assets, twins, &strict),
            Err(EngineError::DuplicateHeir { .. })
        ));
    }

    #[test]
    fn heir_cap_is_enforced() {
        let config = EngineConfig::builder().max_heirs(2).build().unwrap();
        let heirs = (0..3u64).map(|id| HeirRecord::new(id, vec![100])).collect();
        assert_eq!(
            DistributionPlan::generate(&[token(0x11)], heirs, &config),
            Err(EngineError::TooManyHeirs { max: 2, got: 3 })
        );
    }

    #[test]
    fn request_accepts_percentages_and_native() {
        let request: PlanRequest = serde_json::from_str(
            r#"{
                "tokens": ["0x1111111111111111111111111111111111111111"],
                "includeNative": true,
                "heirs": [
                    {"heirId": 1, "name": "  ", "shares": ["30", "40"]},
                    {"heirId": "2", "sharesBps": [7000, 6000]}
                ]
            }"#,
        )
        .unwrap();
        let plan = DistributionPlan::from_request(&request, &EngineConfig::default()).unwrap();
        assert_eq!(plan.assets(), &[Address::NATIVE, token(0x11)]);
        assert_eq!(plan.heirs()[0].shares_bps, vec![3000, 4000]);
        assert_eq!(plan.heirs()[0].name, None);
        assert_eq!(
            plan.root().to_string(),
            "0xfc70c490f473f96111c7ca98a2a3215f51c43e847de4441e1db475918659c729"
        );
    }

    #[test]
    fn tampered_plan_fails_verification() {
        let plan = DistributionPlan::generate(
            &[token(0x11), token(0x22)],
            two_heirs(),
            &EngineConfig::default(),
        )
        .unwrap();
        let mut tampered = plan.clone();
        tampered.heirs[0].shares_bps[0] = 3001;
        assert!(!tampered.verify_all());
    }
}
