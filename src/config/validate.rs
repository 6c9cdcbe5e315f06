use super::EngineConfig;
use crate::errors::{EngineError, EngineResult};

/// Hard ceiling for [`EngineConfig::max_heirs`].
pub const MAX_HEIRS_LIMIT: usize = 1 << 20;

/// Hard ceiling for [`EngineConfig::max_assets`].
pub const MAX_ASSETS_LIMIT: usize = 256;

/// Validates all configuration invariants.
pub fn validate(config: &EngineConfig) -> EngineResult<()> {
    validate_heirs(config.max_heirs)?;
    validate_assets(config.max_assets)?;
    Ok(())
}

fn validate_heirs(max_heirs: usize) -> EngineResult<()> {
    if max_heirs == 0 {
        return Err(EngineError::InvalidConfig {
            reason: "max_heirs must be at least 1",
        });
    }
    if max_heirs > MAX_HEIRS_LIMIT {
        return Err(EngineError::InvalidConfig {
            reason: "max_heirs exceeds 1048576",
        });
    }
    Ok(())
}

fn validate_assets(max_assets: usize) -> EngineResult<()> {
    if max_assets == 0 {
        return Err(EngineError::InvalidConfig {
            reason: "max_assets must be at least 1",
        });
    }
    if max_assets > MAX_ASSETS_LIMIT {
        return Err(EngineError::InvalidConfig {
            reason: "max_assets exceeds 256",
        });
    }
    Ok(())
}
