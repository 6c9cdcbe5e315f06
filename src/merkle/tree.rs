use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};
use crate::hash::{hash_sorted_pair, Hash};

/// Order in which leaves are laid out on level 0 before pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeafOrdering {
    /// Leaves are sorted byte-wise first; the root does not depend on the
    /// order in which heirs were listed.
    #[default]
    Sorted,
    /// Leaves keep their input order.
    Insertion,
}

/// Root plus one proof per input leaf, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOutput {
    pub root: Hash,
    pub proofs: Vec<Vec<Hash>>,
}

/// Builds the tree with the default ordering and returns the root and proofs.
pub fn build_tree(leaves: &[Hash]) -> EngineResult<TreeOutput> {
    let tree = MerkleTree::build(leaves)?;
    Ok(TreeOutput {
        root: tree.root(),
        proofs: tree.proofs(),
    })
}

/// Binary sorted-pair Merkle tree storing every level for proof extraction.
///
/// An odd node at the end of a level is promoted to the next level unchanged
/// and contributes no proof element at that level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Hash>>,
    /// `positions[i]` is the level-0 slot of input leaf `i`.
    positions: Vec<usize>,
    ordering: LeafOrdering,
}

impl MerkleTree {
    /// Builds a tree over `leaves` using [`LeafOrdering::Sorted`].
    pub fn build(leaves: &[Hash]) -> EngineResult<Self> {
        Self::build_with(leaves, LeafOrdering::default())
    }

    /// Builds a tree over `leaves` with an explicit ordering.
    ///
    /// Duplicate leaves are kept; each occupies its own slot.
    pub fn build_with(leaves: &[Hash], ordering: LeafOrdering) -> EngineResult<Self> {
        if leaves.is_empty() {
            return Err(EngineError::EmptyInput);
        }

        let mut slots: Vec<usize> = (0..leaves.len()).collect();
        if ordering == LeafOrdering::Sorted {
            slots.sort_by(|a, b| leaves[*a].cmp(&leaves[*b]));
        }
        let mut positions = vec![0usize; leaves.len()];
        for (slot, &input) in slots.iter().enumerate() {
            positions[input] = slot;
        }

        let base: Vec<Hash> = slots.iter().map(|&input| leaves[input]).collect();
        let mut levels = Vec::new();
        levels.push(base.clone());
        let mut current = base;
        while current.len() > 1 {
            let next = next_level(&current);
            levels.push(next.clone());
            current = next;
        }

        tracing::trace!(
            leaves = leaves.len(),
            depth = levels.len() - 1,
            ?ordering,
            "merkle tree built"
        );

        Ok(Self {
            levels,
            positions,
            ordering,
        })
    }

    /// Root digest. Equals the only leaf for a single-leaf tree.
    pub fn root(&self) -> Hash {
        self.levels
            .last()
            .and_then(|level| level.first().copied())
            .unwrap_or(Hash::ZERO)
    }

    pub fn leaf_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of levels above the leaves; the upper bound on proof length.
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn ordering(&self) -> LeafOrdering {
        self.ordering
    }

    /// Input leaf at `index`.
    pub fn leaf(&self, index: usize) -> Option<Hash> {
        let slot = *self.positions.get(index)?;
        self.levels.first()?.get(slot).copied()
    }

    /// Leaves in level-0 order.
    pub fn leaves(&self) -> &[Hash] {
        self.levels.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// All levels from the leaves (index 0) to the root.
    pub fn levels(&self) -> &[Vec<Hash>] {
        &self.levels
    }

    /// Sibling path for input leaf `index`, leaf to root.
    pub fn proof(&self, index: usize) -> Option<Vec<Hash>> {
        let mut position = *self.positions.get(index)?;
        let mut path = Vec::with_capacity(self.depth());
        for level in &self.levels[..self.depth()] {
            if let Some(sibling) = level.get(position ^ 1) {
                path.push(*sibling);
            }
            position /= 2;
        }
        Some(path)
    }

    /// One proof per input leaf, in input order.
    pub fn proofs(&self) -> Vec<Vec<Hash>> {
        (0..self.leaf_count())
            .filter_map(|index| self.proof(index))
            .collect()
    }
}

fn parent_of(pair: &[Hash]) -> Hash {
    match pair {
        [left, right] => hash_sorted_pair(left, right),
        _ => pair[0],
    }
}

fn next_level(current: &[Hash]) -> Vec<Hash> {
    #[cfg(feature = "parallel")]
    let next: Vec<Hash> = if crate::utils::parallelism_enabled() {
        use rayon::prelude::*;
        let chunk = crate::utils::preferred_chunk_size(current.len().div_ceil(2));
        current
            .par_chunks(2)
            .with_min_len(chunk)
            .map(parent_of)
            .collect()
    } else {
        current.chunks(2).map(parent_of).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let next: Vec<Hash> = current.chunks(2).map(parent_of).collect();
    next
}
