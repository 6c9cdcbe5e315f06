//! Engine configuration.
//!
//! [`EngineConfig`] pins the two wire-level choices that must agree with the
//! on-chain verifier (share packing and leaf ordering) together with the
//! plan-level policies applied before a tree is built.
//!
//! | Knob | Effect |
//! |------|--------|
//! | `packing` | Byte width of each share element inside the leaf payload. |
//! | `ordering` | Whether leaves are sorted before pairing. |
//! | `enforce_allocation` | Reject plans assigning more than 10000 bps of an asset. |
//! | `reject_duplicate_heirs` | Reject repeated heir identifiers. |
//! | `max_heirs` | Upper bound on heirs per plan. |
//! | `max_assets` | Upper bound on assets per plan. |
//!
//! Configurations are built through [`EngineConfigBuilder`], which starts from
//! a [`Profile`] and validates on [`EngineConfigBuilder::build`], or loaded
//! from JSON with [`EngineConfig::from_json_file`]. Fields missing from a
//! JSON document take their [`Profile::Standard`] values.

mod builder;
mod validate;

pub use builder::{EngineConfigBuilder, Profile};
pub use validate::{validate, MAX_ASSETS_LIMIT, MAX_HEIRS_LIMIT};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{EngineResult, FileError};
use crate::leaf::{LeafEncoder, SharePacking};
use crate::merkle::LeafOrdering;

/// Validated engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub packing: SharePacking,
    pub ordering: LeafOrdering,
    pub enforce_allocation: bool,
    pub reject_duplicate_heirs: bool,
    pub max_heirs: usize,
    pub max_assets: usize,
}

impl EngineConfig {
    /// Builder seeded with [`Profile::Standard`].
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Configuration of a built-in profile. Built-in profiles always validate.
    pub fn from_profile(profile: Profile) -> Self {
        EngineConfigBuilder::from_profile(profile).into_unchecked()
    }

    /// Checks the configuration invariants.
    pub fn validate(&self) -> EngineResult<()> {
        validate(self)
    }

    /// Leaf encoder matching [`EngineConfig::packing`].
    pub fn leaf_encoder(&self) -> LeafEncoder {
        LeafEncoder::new(self.packing)
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(text: &str) -> Result<Self, FileError> {
        let config: EngineConfig =
            serde_json::from_str(text).map_err(|err| FileError::json("<inline>", err))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| FileError::io(path, err))?;
        let config: EngineConfig =
            serde_json::from_str(&text).map_err(|err| FileError::json(path, err))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), ?config, "engine configuration loaded");
        Ok(config)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_profile(Profile::Standard)
    }
}
