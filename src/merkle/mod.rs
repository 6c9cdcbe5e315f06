//! Tree builder and proof verifier.
//!
//! Leaves are paired level by level with [`hash_sorted_pair`](crate::hash::hash_sorted_pair).
//! When a level has an odd number of nodes the last one is carried up
//! unchanged, so a proof may be shorter than the tree depth: it holds one
//! sibling per level where a sibling existed, leaf to root, with no position
//! bits.
//!
//! A one-leaf tree has that leaf as its root and an empty proof. Zero leaves
//! is an error.
//!
//! By default leaves are sorted byte-wise before pairing so the root is
//! independent of the order in which heirs were supplied; proofs are still
//! returned in input order. [`LeafOrdering::Insertion`] keeps the input order
//! for compatibility with trees built that way.

mod proof;
mod tree;

pub use proof::{compute_root, verify, verify_bytes, verify_hex};
pub use tree::{build_tree, LeafOrdering, MerkleTree, TreeOutput};
