//! Distribution state gate.
//!
//! Classifies the facts read from the vault into a [`DistributionState`] and
//! a [`ClaimPermission`]. Nothing here causes a transition; the vault moves
//! between states when the owner toggles the switch, confirms activity or a
//! heir claims.
//!
//! Facts arrive asynchronously, so every field of [`ClaimFacts`] is optional.
//! Until all of them are resolved the permission is
//! [`ClaimPermission::Indeterminate`] and no state is reported, even when a
//! fact already known would rule the claim out.

mod countdown;

pub use countdown::{
    period_in_days, period_seconds_from_days, TimeRemaining, SECONDS_PER_DAY, SECONDS_PER_HOUR,
    SECONDS_PER_MINUTE,
};

use serde::{Deserialize, Serialize};

/// Vault facts as observed by the caller, `None` while a read is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimFacts {
    pub switch_enabled: Option<bool>,
    /// Unix seconds of the owner's last confirmed activity.
    pub last_activity_at: Option<u64>,
    pub period_seconds: Option<u64>,
    /// Whether this heir's leaf has already been consumed.
    pub claimed: Option<bool>,
}

impl ClaimFacts {
    /// Facts with every value resolved.
    pub fn resolved(
        switch_enabled: bool,
        last_activity_at: u64,
        period_seconds: u64,
        claimed: bool,
    ) -> Self {
        Self {
            switch_enabled: Some(switch_enabled),
            last_activity_at: Some(last_activity_at),
            period_seconds: Some(period_seconds),
            claimed: Some(claimed),
        }
    }

    /// `lastActivity + period`, saturating on overflow.
    pub fn expires_at(&self) -> Option<u64> {
        Some(self.last_activity_at?.saturating_add(self.period_seconds?))
    }

    /// `now >= lastActivity + period`.
    pub fn is_expired(&self, now: u64) -> Option<bool> {
        self.expires_at().map(|deadline| now >= deadline)
    }

    /// Time left before the period elapses.
    pub fn time_remaining(&self, now: u64) -> Option<TimeRemaining> {
        self.expires_at()
            .map(|deadline| TimeRemaining::until(deadline, now))
    }
}

/// Lifecycle position of a vault as seen by one heir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionState {
    /// The switch is off.
    NotConfigured,
    /// Switch on, period still running.
    Armed,
    /// Switch on, period elapsed.
    Expired,
    /// This heir's leaf has been consumed.
    Claimed,
}

/// Why a claim is currently impossible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    SwitchDisabled,
    AlreadyClaimed,
    NotExpired,
}

/// Outcome of the claim check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum ClaimPermission {
    Allowed,
    Denied(DenialReason),
    /// At least one needed fact is still unknown.
    Indeterminate,
}

impl ClaimPermission {
    /// `Some(can_claim)` once decided, `None` while indeterminate.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ClaimPermission::Allowed => Some(true),
            ClaimPermission::Denied(_) => Some(false),
            ClaimPermission::Indeterminate => None,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, ClaimPermission::Allowed)
    }
}

/// Maps the facts onto a state, `None` while any fact is pending.
///
/// A consumed leaf is terminal and wins over every other fact.
pub fn classify(facts: &ClaimFacts, now: u64) -> Option<DistributionState> {
    let (switch_enabled, expired, claimed) = resolve(facts, now)?;
    Some(if claimed {
        DistributionState::Claimed
    } else if !switch_enabled {
        DistributionState::NotConfigured
    } else if expired {
        DistributionState::Expired
    } else {
        DistributionState::Armed
    })
}

/// `switchEnabled && isExpired && !claimed`, indeterminate while any fact is
/// pending.
pub fn can_claim(facts: &ClaimFacts, now: u64) -> ClaimPermission {
    let Some((switch_enabled, expired, claimed)) = resolve(facts, now) else {
        return ClaimPermission::Indeterminate;
    };
    if !switch_enabled {
        ClaimPermission::Denied(DenialReason::SwitchDisabled)
    } else if claimed {
        ClaimPermission::Denied(DenialReason::AlreadyClaimed)
    } else if !expired {
        ClaimPermission::Denied(DenialReason::NotExpired)
    } else {
        ClaimPermission::Allowed
    }
}

/// `(switch_enabled, is_expired, claimed)` once every fact is known.
fn resolve(facts: &ClaimFacts, now: u64) -> Option<(bool, bool, bool)> {
    Some((facts.switch_enabled?, facts.is_expired(now)?, facts.claimed?))
}

/// Everything a status view needs for one heir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateReport {
    pub state: Option<DistributionState>,
    pub permission: ClaimPermission,
    pub can_claim: Option<bool>,
    pub expires_at: Option<u64>,
    pub remaining: Option<TimeRemaining>,
}

/// Evaluates state, permission and countdown at `now`.
pub fn evaluate(facts: &ClaimFacts, now: u64) -> GateReport {
    let permission = can_claim(facts, now);
    let report = GateReport {
        state: classify(facts, now),
        permission,
        can_claim: permission.as_bool(),
        expires_at: facts.expires_at(),
        remaining: facts.time_remaining(now),
    };
    tracing::debug!(state = ?report.state, permission = ?report.permission, "claim gate evaluated");
    report
}
