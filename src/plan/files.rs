//! Plan and proof files.
//!
//! `merkleTree.json` holds the whole plan; one `heir_<id>[_<name>].json` per
//! heir holds what that heir needs to claim. Both use camelCase keys and `0x`
//! hex digests.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{Address, DistributionPlan, PlanRequest, PlannedHeir};
use crate::errors::FileError;
use crate::hash::Hash;
use crate::leaf::{HeirId, LeafEncoder, SharePacking};
use crate::merkle::{self, LeafOrdering};

/// File name of the full plan.
pub const PLAN_FILE_NAME: &str = "merkleTree.json";

const RESERVED_FILE_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Contents of `merkleTree.json`.
///
/// `packing` and `ordering` are only written when they differ from the
/// defaults, so standard plans keep the plain layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFile {
    pub root: Hash,
    pub tokens: Vec<Address>,
    pub leaves: Vec<Hash>,
    pub heirs: Vec<PlannedHeir>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub packing: SharePacking,
    #[serde(default, skip_serializing_if = "is_default")]
    pub ordering: LeafOrdering,
}

impl PlanFile {
    pub fn from_plan(plan: &DistributionPlan) -> Self {
        Self {
            root: plan.root(),
            tokens: plan.assets().to_vec(),
            leaves: plan.leaves(),
            heirs: plan.heirs().to_vec(),
            packing: plan.packing(),
            ordering: plan.ordering(),
        }
    }

    /// Whether `heir` belongs to this plan, re-deriving its leaf with the
    /// plan's own packing.
    pub fn accepts(&self, heir: &HeirProofFile) -> bool {
        heir.check_leaf(self.packing)
            && self.contains_leaf(&heir.leaf)
            && heir.verify_against(&self.root)
    }

    /// Whether `leaf` is one of the committed leaves.
    pub fn contains_leaf(&self, leaf: &Hash) -> bool {
        self.leaves.contains(leaf)
    }
}

/// Contents of one heir's proof file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeirProofFile {
    pub heir_id: HeirId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub shares_bps: Vec<u16>,
    pub leaf: Hash,
    pub proof: Vec<Hash>,
    /// Plan owner, used to locate the vault.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Address>,
}

impl HeirProofFile {
    pub fn from_planned(heir: &PlannedHeir, owner: Option<Address>) -> Self {
        Self {
            heir_id: heir.heir_id,
            name: heir.name.clone(),
            shares_bps: heir.shares_bps.clone(),
            leaf: heir.leaf,
            proof: heir.proof.clone(),
            owner,
        }
    }

    /// Recomputes the leaf from `heirId` and `sharesBps` and compares it with
    /// the stored one.
    pub fn check_leaf(&self, packing: SharePacking) -> bool {
        LeafEncoder::new(packing).encode(&self.heir_id, &self.shares_bps) == self.leaf
    }

    /// Runs the stored leaf and proof against `root`.
    pub fn verify_against(&self, root: &Hash) -> bool {
        merkle::verify(&self.leaf, &self.proof, root)
    }

    /// Share vector exactly as it must be replayed to the claim call.
    pub fn claim_shares(&self) -> &[u16] {
        &self.shares_bps
    }
}

/// Replaces characters that are not allowed in file names with `_` and
/// trims surrounding whitespace.
pub fn sanitize_file_stem(stem: &str) -> String {
    stem.replace(RESERVED_FILE_CHARS, "_").trim().to_string()
}

/// `heir_<id>.json`, or `heir_<id>_<name>.json` when the heir has a name.
pub fn heir_file_name(heir_id: &HeirId, name: Option<&str>) -> String {
    let name_part = match name.map(str::trim) {
        Some(name) if !name.is_empty() => format!("_{}", sanitize_file_stem(name)),
        _ => String::new(),
    };
    format!("{}.json", sanitize_file_stem(&format!("heir_{heir_id}{name_part}")))
}

/// Paths written by [`write_plan_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub plan: PathBuf,
    pub heirs: Vec<PathBuf>,
}

/// Writes `merkleTree.json` and one proof file per heir into `dir`, creating
/// it if needed. Heirs sharing a file name overwrite each other in order.
pub fn write_plan_files(
    plan: &DistributionPlan,
    dir: impl AsRef<Path>,
    owner: Option<Address>,
) -> Result<WrittenFiles, FileError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|err| FileError::io(dir, err))?;

    let plan_path = dir.join(PLAN_FILE_NAME);
    write_json(&plan_path, &PlanFile::from_plan(plan))?;

    let mut heirs = Vec::with_capacity(plan.heirs().len());
    for heir in plan.heirs() {
        let path = dir.join(heir_file_name(&heir.heir_id, heir.name.as_deref()));
        write_json(&path, &HeirProofFile::from_planned(heir, owner))?;
        heirs.push(path);
    }

    tracing::debug!(
        dir = %dir.display(),
        heir_files = heirs.len(),
        root = %plan.root(),
        "plan files written"
    );
    Ok(WrittenFiles {
        plan: plan_path,
        heirs,
    })
}

pub fn read_plan_file(path: impl AsRef<Path>) -> Result<PlanFile, FileError> {
    read_json(path.as_ref())
}

pub fn read_heir_file(path: impl AsRef<Path>) -> Result<HeirProofFile, FileError> {
    read_json(path.as_ref())
}

/// Loads a JSON plan request as accepted by [`DistributionPlan::from_request`].
pub fn read_plan_request(path: impl AsRef<Path>) -> Result<PlanRequest, FileError> {
    read_json(path.as_ref())
}

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), FileError> {
    let text = serde_json::to_string_pretty(value).map_err(|err| FileError::json(path, err))?;
    fs::write(path, text).map_err(|err| FileError::io(path, err))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FileError> {
    let text = fs::read_to_string(path).map_err(|err| FileError::io(path, err))?;
    serde_json::from_str(&text).map_err(|err| FileError::json(path, err))
}
