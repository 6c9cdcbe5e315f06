use crate::errors::{EngineError, EngineResult};
use crate::hash::{hash_sorted_pair, Hash, DIGEST_SIZE};

/// Folds `proof` onto `leaf` with sorted-pair hashing and returns the
/// resulting root candidate.
pub fn compute_root(leaf: &Hash, proof: &[Hash]) -> Hash {
    proof
        .iter()
        .fold(*leaf, |node, sibling| hash_sorted_pair(&node, sibling))
}

/// Returns `true` when `proof` links `leaf` to `root`.
///
/// An empty proof verifies exactly when `leaf == root`.
pub fn verify(leaf: &Hash, proof: &[Hash], root: &Hash) -> bool {
    compute_root(leaf, proof) == *root
}

/// Byte-level variant of [`verify`].
///
/// Fails with [`EngineError::InvalidEncoding`] when any input is not exactly
/// 32 bytes; a well-formed proof that does not match yields `Ok(false)`.
pub fn verify_bytes<P: AsRef<[u8]>>(leaf: &[u8], proof: &[P], root: &[u8]) -> EngineResult<bool> {
    let leaf = digest_from_slice("leaf", leaf)?;
    let root = digest_from_slice("root", root)?;
    let proof = proof
        .iter()
        .map(|element| digest_from_slice("proof", element.as_ref()))
        .collect::<EngineResult<Vec<_>>>()?;
    Ok(verify(&leaf, &proof, &root))
}

/// Hex variant of [`verify`]; each value may carry a `0x` prefix.
pub fn verify_hex<S: AsRef<str>>(leaf: &str, proof: &[S], root: &str) -> EngineResult<bool> {
    let leaf = digest_from_hex("leaf", leaf)?;
    let root = digest_from_hex("root", root)?;
    let proof = proof
        .iter()
        .map(|element| digest_from_hex("proof", element.as_ref()))
        .collect::<EngineResult<Vec<_>>>()?;
    Ok(verify(&leaf, &proof, &root))
}

fn digest_from_slice(field: &'static str, bytes: &[u8]) -> EngineResult<Hash> {
    if bytes.len() != DIGEST_SIZE {
        return Err(EngineError::encoding(
            field,
            format!("expected {DIGEST_SIZE} bytes, got {}", bytes.len()),
        ));
    }
    Hash::from_slice(bytes)
}

fn digest_from_hex(field: &'static str, text: &str) -> EngineResult<Hash> {
    Hash::from_hex(text).map_err(|err| match err {
        EngineError::InvalidEncoding { reason, .. } => EngineError::InvalidEncoding { field, reason },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::keccak256;
    use crate::merkle::{LeafOrdering, MerkleTree};

    fn leaves(count: usize) -> Vec<Hash> {
        (0..count)
            .map(|i| keccak256(&(i as u64).to_be_bytes()))
            .collect()
    }

    #[test]
    fn every_generated_proof_verifies() {
        for count in 1..=9 {
            let leaves = leaves(count);
            for ordering in [LeafOrdering::Sorted, LeafOrdering::Insertion] {
                let tree = MerkleTree::build_with(&leaves, ordering).unwrap();
                for (index, leaf) in leaves.iter().enumerate() {
                    let proof = tree.proof(index).unwrap();
                    assert!(verify(leaf, &proof, &tree.root()), "count {count} index {index}");
                }
            }
        }
    }

    #[test]
    fn single_leaf_with_empty_proof() {
        let leaf = keccak256(b"solo");
        assert!(verify(&leaf, &[], &leaf));
        assert!(!verify(&leaf, &[], &keccak256(b"other")));
    }

    #[test]
    fn proof_for_another_leaf_fails() {
        let leaves = leaves(4);
        let tree = MerkleTree::build(&leaves).unwrap();
        let proof = tree.proof(0).unwrap();
        assert!(!verify(&leaves[1], &proof, &tree.root()));
    }

    #[test]
    fn flipped_sibling_bit_fails() {
        let leaves = leaves(6);
        let tree = MerkleTree::build(&leaves).unwrap();
        let mut proof = tree.proof(2).unwrap();
        let mut bytes = proof[0].into_bytes();
        bytes[0] ^= 0x01;
        proof[0] = Hash::from(bytes);
        assert!(!verify(&leaves[2], &proof, &tree.root()));
    }

    #[test]
    fn truncated_or_extended_proof_fails() {
        let leaves = leaves(5);
        let tree = MerkleTree::build(&leaves).unwrap();
        let proof = tree.proof(1).unwrap();
        assert!(!verify(&leaves[1], &proof[..proof.len() - 1], &tree.root()));
        let mut longer = proof.clone();
        longer.push(leaves[0]);
        assert!(!verify(&leaves[1], &longer, &tree.root()));
    }

    #[test]
    fn byte_lengths_are_checked() {
        let leaf = [0u8; 32];
        let err = verify_bytes(&leaf, &[[0u8; 31].as_slice()], &leaf).unwrap_err();
        assert!(matches!(err, EngineError::InvalidEncoding { field: "proof", .. }));
        let err = verify_bytes(&leaf[..4], &Vec::<Vec<u8>>::new(), &leaf).unwrap_err();
        assert!(matches!(err, EngineError::InvalidEncoding { field: "leaf", .. }));
        assert!(verify_bytes(&leaf, &Vec::<Vec<u8>>::new(), &leaf).unwrap());
    }

    #[test]
    fn hex_inputs_accept_optional_prefix() {
        let leaves = leaves(2);
        let tree = MerkleTree::build(&leaves).unwrap();
        let proof: Vec<String> = tree
            .proof(0)
            .unwrap()
            .iter()
            .map(|h| h.to_hex())
            .collect();
        let root = tree.root().to_string();
        assert!(verify_hex(&leaves[0].to_string(), &proof, &root).unwrap());
        assert!(verify_hex(&leaves[0].to_hex(), &proof, &root[2..]).unwrap());

        let err = verify_hex("0x12", &proof, &root).unwrap_err();
        assert!(matches!(err, EngineError::InvalidEncoding { field: "leaf", .. }));
    }
}
