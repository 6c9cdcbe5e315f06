use tiny_keccak::{Hasher as _, Keccak};

use super::{Hash, DIGEST_SIZE};

/// Streaming Keccak-256 helper.
#[derive(Clone)]
pub struct Hasher {
    inner: Keccak,
}

impl Hasher {
    /// Creates a fresh Keccak-256 state.
    pub fn new() -> Self {
        Self {
            inner: Keccak::v256(),
        }
    }

    /// Absorbs additional bytes into the hasher state.
    pub fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// Finalises the hasher and returns the 32-byte digest.
    pub fn finalize(self) -> Hash {
        let mut out = [0u8; DIGEST_SIZE];
        self.inner.finalize(&mut out);
        Hash::from_bytes(out)
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Keccak-256 of `input`.
pub fn keccak256(input: &[u8]) -> Hash {
    let mut hasher = Hasher::new();
    hasher.update(input);
    hasher.finalize()
}

/// Parent digest of two children under sorted-pair hashing.
///
/// `hash_sorted_pair(a, b) == hash_sorted_pair(b, a)` for all inputs.
pub fn hash_sorted_pair(a: &Hash, b: &Hash) -> Hash {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Hasher::new();
    hasher.update(first.as_bytes());
    hasher.update(second.as_bytes());
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_matches_reference() {
        assert_eq!(
            keccak256(b"").to_hex(),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn abc_matches_reference() {
        assert_eq!(
            keccak256(b"abc").to_hex(),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
    }

    #[test]
    fn streaming_equals_one_shot() {
        let mut hasher = Hasher::new();
        hasher.update(b"a");
        hasher.update(b"bc");
        assert_eq!(hasher.finalize(), keccak256(b"abc"));
    }

    #[test]
    fn sorted_pair_is_symmetric() {
        let a = keccak256(b"left");
        let b = keccak256(b"right");
        assert_eq!(hash_sorted_pair(&a, &b), hash_sorted_pair(&b, &a));
    }

    #[test]
    fn sorted_pair_absorbs_smaller_first() {
        let a = keccak256(b"left");
        let b = keccak256(b"right");
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let mut concat = Vec::with_capacity(2 * DIGEST_SIZE);
        concat.extend_from_slice(lo.as_bytes());
        concat.extend_from_slice(hi.as_bytes());
        assert_eq!(hash_sorted_pair(&a, &b), keccak256(&concat));
    }
}
