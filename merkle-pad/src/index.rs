//! Leaf hash → leaf node lookup.

use std::collections::HashMap;

use crate::{Digest, NodeId};

/// Maps every distinct leaf hash to one leaf carrying it.
///
/// When several leaves share a hash (repeated content, padding duplicates)
/// the leftmost recorded leaf wins; any of them yields a valid proof.
#[derive(Debug, Default, Clone)]
pub struct TreeIndex {
    leaves: HashMap<Digest, NodeId>,
}

impl TreeIndex {
    /// Leaf carrying `hash`, if any.
    pub fn get(&self, hash: &Digest) -> Option<NodeId> {
        self.leaves.get(hash).copied()
    }

    /// `true` if some leaf carries `hash`.
    pub fn contains(&self, hash: &Digest) -> bool {
        self.leaves.contains_key(hash)
    }

    /// Number of distinct leaf hashes.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// `true` if no leaf was recorded.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Record `leaf` under `hash` unless another leaf already holds it.
    pub(crate) fn record(&mut self, hash: Digest, leaf: NodeId) {
        self.leaves.entry(hash).or_insert(leaf);
    }

    /// Drop the entry for `hash` if it points at `leaf`. Returns whether an
    /// entry was removed.
    pub(crate) fn forget(&mut self, hash: &Digest, leaf: NodeId) -> bool {
        if self.leaves.get(hash) == Some(&leaf) {
            self.leaves.remove(hash);
            true
        } else {
            false
        }
    }
}
