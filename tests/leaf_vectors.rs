
use _fixtures::{
    hash, ABI_WORD_HEIR_ONE_LEAF, ABI_WORD_HEIR_TWO_LEAF, HEIR_ONE_LEAF, HEIR_THREE_LEAF,
    HEIR_TWO_LEAF,
};
use heir_merkle::hash::keccak256;
use heir_merkle::leaf::{encode_leaf, pack_leaf, HeirId, LeafEncoder, SharePacking};
use heir_merkle::EngineError;
use proptest::prelude::*;

#[test]
fn compact_reference_leaves() {
    assert_eq!(encode_leaf(&HeirId::from(1u64), &[3000, 4000]), hash(HEIR_ONE_LEAF));
    assert_eq!(encode_leaf(&HeirId::from(2u64), &[7000, 6000]), hash(HEIR_TWO_LEAF));
    assert_eq!(encode_leaf(&HeirId::from(3u64), &[0, 0]), hash(HEIR_THREE_LEAF));
}

#[test]
fn word_padded_reference_leaves() {
    let encoder = LeafEncoder::new(SharePacking::AbiWord);
    assert_eq!(
        encoder.encode(&HeirId::from(1u64), &[3000, 4000]),
        hash(ABI_WORD_HEIR_ONE_LEAF)
    );
    assert_eq!(
        encoder.encode(&HeirId::from(2u64), &[7000, 6000]),
        hash(ABI_WORD_HEIR_TWO_LEAF)
    );
}

#[test]
fn empty_share_vector_reference() {
    insta::assert_snapshot!(
        encode_leaf(&HeirId::from(7u64), &[]).to_string(),
        @"0xa66cc928b5edb82af9bd49922954155ab7b0942694bea4ce44661d9a8736c688"
    );
}

#[test]
fn packed_bytes_for_heir_one() {
    let packed = pack_leaf(&HeirId::from(1u64), &[3000, 4000], SharePacking::Compact);
    insta::assert_snapshot!(
        hex::encode(&packed),
        @"00000000000000000000000000000000000000000000000000000000000000010bb80fa0"
    );
}

#[test]
fn identifiers_from_text() {
    let decimal: HeirId = "1".parse().unwrap();
    let hex: HeirId = "0x01".parse().unwrap();
    assert_eq!(encode_leaf(&decimal, &[3000, 4000]), encode_leaf(&hex, &[3000, 4000]));
    assert!(matches!(
        "-1".parse::<HeirId>(),
        Err(EngineError::InvalidIdentifier { .. })
    ));
    assert!(matches!(
        "1.5".parse::<HeirId>(),
        Err(EngineError::InvalidIdentifier { .. })
    ));
}

#[test]
fn untyped_shares_are_range_checked() {
    let encoder = LeafEncoder::default();
    let id = HeirId::from(1u64);
    assert_eq!(
        encoder.encode_values(&id, &[3000, 4000]).unwrap(),
        hash(HEIR_ONE_LEAF)
    );
    assert_eq!(
        encoder.encode_values(&id, &[3000, 65_536]).unwrap_err(),
        EngineError::InvalidShare {
            index: 1,
            value: 65_536
        }
    );
}

proptest! {
    #[test]
    fn encoding_is_deterministic(id in any::<[u8; 32]>(), shares in proptest::collection::vec(any::<u16>(), 0..33)) {
        let id = HeirId::from_be_bytes(id);
        prop_assert_eq!(encode_leaf(&id, &shares), encode_leaf(&id, &shares));
        for packing in [SharePacking::Compact, SharePacking::AbiWord] {
            let packed = pack_leaf(&id, &shares, packing);
            prop_assert_eq!(packed.len(), packing.payload_len(shares.len()));
            prop_assert_eq!(LeafEncoder::new(packing).encode(&id, &shares), keccak256(&packed));
        }
    }

    #[test]
    fn different_shares_give_different_leaves(id in any::<u64>(), a in any::<u16>(), b in any::<u16>()) {
        prop_assume!(a != b);
        let id = HeirId::from(id);
        prop_assert_ne!(encode_leaf(&id, &[a]), encode_leaf(&id, &[b]));
    }
}
