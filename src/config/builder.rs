use serde::{Deserialize, Serialize};

use super::EngineConfig;
use crate::errors::EngineResult;
use crate::leaf::SharePacking;
use crate::merkle::LeafOrdering;

/// Builder used to assemble an [`EngineConfig`] with validation.
///
/// | Field | Default |
/// |-------|---------|
/// | `packing` | [`SharePacking::Compact`] |
/// | `ordering` | [`LeafOrdering::Sorted`] |
/// | `enforce_allocation` | `true` |
/// | `reject_duplicate_heirs` | `false` |
/// | `max_heirs` | `1024` |
/// | `max_assets` | `32` |
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    pub packing: SharePacking,
    pub ordering: LeafOrdering,
    pub enforce_allocation: bool,
    pub reject_duplicate_heirs: bool,
    pub max_heirs: usize,
    pub max_assets: usize,
}

impl EngineConfigBuilder {
    /// Returns a builder initialised with the standard profile.
    pub fn new() -> Self {
        Self::from_profile(Profile::Standard)
    }

    /// Loads one of the built-in profiles.
    ///
    /// | Profile | Packing | Ordering | Use |
    /// |---------|---------|----------|-----|
    /// | `Standard` | Compact | Sorted | New plans; root independent of heir order. |
    /// | `WebClientV1` | AbiWord | Insertion | Re-deriving trees exported by the first web client. |
    pub fn from_profile(profile: Profile) -> Self {
        let (packing, ordering) = match profile {
            Profile::Standard => (SharePacking::Compact, LeafOrdering::Sorted),
            Profile::WebClientV1 => (SharePacking::AbiWord, LeafOrdering::Insertion),
        };
        EngineConfigBuilder {
            packing,
            ordering,
            enforce_allocation: true,
            reject_duplicate_heirs: false,
            max_heirs: 1024,
            max_assets: 32,
        }
    }

    pub fn packing(mut self, packing: SharePacking) -> Self {
        self.packing = packing;
        self
    }

    pub fn ordering(mut self, ordering: LeafOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn enforce_allocation(mut self, enforce: bool) -> Self {
        self.enforce_allocation = enforce;
        self
    }

    pub fn reject_duplicate_heirs(mut self, reject: bool) -> Self {
        self.reject_duplicate_heirs = reject;
        self
    }

    pub fn max_heirs(mut self, max_heirs: usize) -> Self {
        self.max_heirs = max_heirs;
        self
    }

    pub fn max_assets(mut self, max_assets: usize) -> Self {
        self.max_assets = max_assets;
        self
    }

    /// Validates the builder fields and emits an [`EngineConfig`].
    pub fn build(&self) -> EngineResult<EngineConfig> {
        let config = self.clone().into_unchecked();
        config.validate()?;
        Ok(config)
    }

    pub(super) fn into_unchecked(self) -> EngineConfig {
        EngineConfig {
            packing: self.packing,
            ordering: self.ordering,
            enforce_allocation: self.enforce_allocation,
            reject_duplicate_heirs: self.reject_duplicate_heirs,
            max_heirs: self.max_heirs,
            max_assets: self.max_assets,
        }
    }
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in configuration profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Compact packing, sorted leaves.
    #[default]
    Standard,
    /// Word-padded packing, insertion order.
    WebClientV1,
}
