#![cfg(feature = "parallel")]


use _fixtures::{numbered_leaves, TOKEN_A};
use heir_merkle::entitlement::{entitlement_table, AssetBalance};
use heir_merkle::merkle::{LeafOrdering, MerkleTree};
use heir_merkle::plan::{Address, DistributionPlan, HeirRecord};
use heir_merkle::utils::set_parallelism;
use heir_merkle::EngineConfig;

#[test]
fn merkle_parallel_matches_sequential() {
    let leaves = numbered_leaves(1_000);
    for ordering in [LeafOrdering::Sorted, LeafOrdering::Insertion] {
        let baseline = {
            let _guard = set_parallelism(false);
            MerkleTree::build_with(&leaves, ordering).expect("sequential tree")
        };
        let parallel = MerkleTree::build_with(&leaves, ordering).expect("parallel tree");
        assert_eq!(baseline, parallel);
    }
}

#[test]
fn plan_parallel_matches_sequential() {
    let heirs: Vec<HeirRecord> = (1..=600u64).map(|id| HeirRecord::new(id, vec![10])).collect();
    let config = EngineConfig::default();
    let baseline = {
        let _guard = set_parallelism(false);
        DistributionPlan::generate(&[TOKEN_A], heirs.clone(), &config).expect("sequential plan")
    };
    let parallel = DistributionPlan::generate(&[TOKEN_A], heirs, &config).expect("parallel plan");
    assert_eq!(baseline, parallel);
}

#[test]
fn entitlement_table_parallel_matches_sequential() {
    let balances: Vec<AssetBalance> = (0..300u32)
        .map(|i| AssetBalance::new(Address::from_bytes([(i % 255) as u8 + 1; 20]), i * 1_000))
        .collect();
    let shares: Vec<u16> = (0..300u16).map(|i| i * 30).collect();
    let baseline = {
        let _guard = set_parallelism(false);
        entitlement_table(&shares, &balances, false)
    };
    assert_eq!(baseline, entitlement_table(&shares, &balances, false));
}
