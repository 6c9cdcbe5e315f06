
use _fixtures::{two_heir_plan, TOKEN_A, TOKEN_B};
use heir_merkle::entitlement::{entitlement, entitlement_table, AssetBalance};
use heir_merkle::gate::{
    can_claim, classify, evaluate, period_seconds_from_days, ClaimFacts, ClaimPermission,
    DenialReason, DistributionState,
};
use heir_merkle::merkle::verify;
use heir_merkle::plan::Address;
use num_bigint::BigUint;
use proptest::prelude::*;

const LAST_ACTIVITY: u64 = 1_735_689_600;

fn facts(switch_enabled: bool, claimed: bool) -> ClaimFacts {
    ClaimFacts::resolved(
        switch_enabled,
        LAST_ACTIVITY,
        period_seconds_from_days(365),
        claimed,
    )
}

#[test]
fn two_heir_scenario_end_to_end() {
    let plan = two_heir_plan();
    for heir in plan.heirs() {
        assert!(verify(&heir.leaf, &heir.proof, &plan.root()));
    }
    let heir_one = &plan.heirs()[0];
    let owed = entitlement(
        i64::from(heir_one.shares_bps[0]),
        &BigUint::from(10_000u32),
        false,
    );
    assert_eq!(owed, BigUint::from(3_000u32));
}

#[test]
fn table_for_heir_two_over_plan_assets() {
    let plan = two_heir_plan();
    let heir_two = &plan.heirs()[1];
    let balances = vec![
        AssetBalance::new(TOKEN_A, 1_000_000u32),
        AssetBalance::new(Address::ZERO, 0u32),
        AssetBalance::new(TOKEN_B, 333u32),
    ];
    let rows = entitlement_table(&heir_two.shares_bps, &balances, false);
    let entitled: Vec<String> = rows.iter().map(|row| row.entitled.to_string()).collect();
    assert_eq!(entitled, vec!["700000", "199"]);
}

#[test]
fn gate_truth_table() {
    let deadline = LAST_ACTIVITY + period_seconds_from_days(365);

    let disabled = facts(false, false);
    assert_eq!(can_claim(&disabled, deadline + 10).as_bool(), Some(false));

    let armed = facts(true, false);
    assert_eq!(can_claim(&armed, deadline - 1).as_bool(), Some(false));
    assert_eq!(classify(&armed, deadline - 1), Some(DistributionState::Armed));

    assert_eq!(can_claim(&armed, deadline), ClaimPermission::Allowed);
    assert_eq!(classify(&armed, deadline), Some(DistributionState::Expired));

    let claimed = facts(true, true);
    assert_eq!(
        can_claim(&claimed, deadline),
        ClaimPermission::Denied(DenialReason::AlreadyClaimed)
    );
}

#[test]
fn pending_reads_yield_indeterminate() {
    let mut pending = facts(true, false);
    pending.last_activity_at = None;
    let report = evaluate(&pending, LAST_ACTIVITY);
    assert_eq!(report.permission, ClaimPermission::Indeterminate);
    assert_eq!(report.can_claim, None);
    assert_eq!(report.state, None);
    assert_eq!(report.remaining, None);
}

#[test]
fn report_serialises_for_status_views() {
    let report = evaluate(&facts(true, false), LAST_ACTIVITY + 10);
    insta::assert_snapshot!(serde_json::to_string(&report).unwrap(), @r#"{"state":"armed","permission":{"status":"denied","reason":"not_expired"},"canClaim":false,"expiresAt":1767225600,"remaining":{"totalSeconds":31535990,"days":364,"hours":23,"minutes":59,"seconds":50}}"#);
}

proptest! {
    #[test]
    fn can_claim_matches_boolean_formula(
        switch_enabled in any::<bool>(),
        claimed in any::<bool>(),
        last in 0u64..1_000_000,
        period in 0u64..1_000_000,
        now in 0u64..3_000_000,
    ) {
        let facts = ClaimFacts::resolved(switch_enabled, last, period, claimed);
        let expected = switch_enabled && now >= last + period && !claimed;
        prop_assert_eq!(can_claim(&facts, now).as_bool(), Some(expected));
    }

    #[test]
    fn any_pending_fact_keeps_the_gate_open_ended(
        switch_enabled in any::<bool>(),
        claimed in any::<bool>(),
        last in 0u64..1_000_000,
        period in 0u64..1_000_000,
        now in 0u64..3_000_000,
        missing in 0usize..4,
    ) {
        let mut facts = ClaimFacts::resolved(switch_enabled, last, period, claimed);
        match missing {
            0 => facts.switch_enabled = None,
            1 => facts.last_activity_at = None,
            2 => facts.period_seconds = None,
            _ => facts.claimed = None,
        }
        prop_assert_eq!(can_claim(&facts, now), ClaimPermission::Indeterminate);
        prop_assert_eq!(classify(&facts, now), None);
    }

    #[test]
    fn entitlement_never_exceeds_balance(share in any::<i64>(), balance in any::<u128>(), claimed in any::<bool>()) {
        let balance = BigUint::from(balance);
        let owed = entitlement(share, &balance, claimed);
        prop_assert!(owed <= balance);
        if claimed {
            prop_assert_eq!(owed, BigUint::from(0u32));
        }
    }
}
