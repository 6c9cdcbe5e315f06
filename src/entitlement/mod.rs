//! Entitlement calculator.
//!
//! Estimates what a heir would receive at the current vault balances. The
//! figures are advisory: the on-chain claim is the source of truth for what
//! is actually paid out.
//!
//! Amounts are computed as `floor(balance * bps / 10000)` in exact integer
//! arithmetic. Shares outside `0..=10000` are clamped rather than rejected so
//! a corrupted proof file still renders; nothing here caps what the chain
//! will accept.

mod amount;

pub use amount::{decimal, parse_amount};

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::plan::{Address, AssetKind};

/// Basis points making up 100%.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Clamps a raw share into `0..=10000`.
pub fn clamp_bps(share_bps: i64) -> u16 {
    share_bps.clamp(0, i64::from(BPS_DENOMINATOR)) as u16
}

/// Amount owed for one asset.
///
/// Returns zero once the heir has claimed, whatever the share or balance.
pub fn entitlement(share_bps: i64, balance: &BigUint, already_claimed: bool) -> BigUint {
    if already_claimed {
        return BigUint::zero();
    }
    let bps = BigUint::from(clamp_bps(share_bps));
    balance * bps / BigUint::from(BPS_DENOMINATOR)
}

/// Balance observed for one vault asset slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBalance {
    pub asset: Address,
    #[serde(with = "decimal")]
    pub balance: BigUint,
}

impl AssetBalance {
    pub fn new(asset: Address, balance: impl Into<BigUint>) -> Self {
        Self {
            asset,
            balance: balance.into(),
        }
    }
}

/// One row of an entitlement table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEntitlement {
    pub asset: Address,
    pub kind: AssetKind,
    /// Share as committed in the proof file, before clamping.
    pub share_bps: u16,
    #[serde(with = "decimal")]
    pub vault_balance: BigUint,
    #[serde(with = "decimal")]
    pub entitled: BigUint,
}

/// Computes one row per configured vault asset.
///
/// Zero-address slots are dropped before indexing, so `shares_bps[i]`
/// applies to the `i`-th non-empty slot. A share vector shorter than the slot
/// list contributes 0 bps for the missing positions.
pub fn entitlement_table(
    shares_bps: &[u16],
    balances: &[AssetBalance],
    already_claimed: bool,
) -> Vec<AssetEntitlement> {
    let slots: Vec<&AssetBalance> = balances.iter().filter(|slot| !slot.asset.is_zero()).collect();

    let row = |(index, slot): (usize, &&AssetBalance)| {
        let share_bps = shares_bps.get(index).copied().unwrap_or(0);
        AssetEntitlement {
            asset: slot.asset,
            kind: slot.asset.kind(),
            share_bps,
            vault_balance: slot.balance.clone(),
            entitled: entitlement(i64::from(share_bps), &slot.balance, already_claimed),
        }
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<AssetEntitlement> = if crate::utils::parallelism_enabled() {
        use rayon::prelude::*;
        let chunk = crate::utils::preferred_chunk_size(slots.len());
        slots
            .par_iter()
            .enumerate()
            .with_min_len(chunk)
            .map(row)
            .collect()
    } else {
        slots.iter().enumerate().map(row).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<AssetEntitlement> = slots.iter().enumerate().map(row).collect();

    tracing::debug!(assets = rows.len(), already_claimed, "entitlement table computed");
    rows
}
