//! Single-item insertion without rebuilding the tree.
//!
//! Padding leaves are free slots. While one exists, a new item overwrites the
//! leftmost of them and only the ancestors of that slot are rehashed. Once
//! every slot holds genuine content the leaf count is a power of two, and the
//! tree grows: a subtree of the same size is built next to the current root,
//! holding the new item followed by padding copies of it.

use log::{debug, trace};
use merkle_pad_costs::{cost_return_on_error_no_add, CostResult, CostsExt, OperationCost};

use crate::{builder::TreeBuilder, Error, MerkleHasher, MerkleTree, NodeId, Result, Side};

/// How [`MerkleTree::add_item`] placed the new content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePath {
    /// An existing padding leaf was overwritten.
    Replaced {
        /// The overwritten leaf.
        leaf: NodeId,
        /// Its position among the leaves, left to right.
        position: usize,
    },
    /// The tree doubled its leaf count under a new root.
    Grew {
        /// The new genuine leaf.
        leaf: NodeId,
        /// Its position among the leaves, left to right.
        position: usize,
        /// The new root.
        root: NodeId,
    },
}

impl UpdatePath {
    /// The leaf now holding the added content.
    pub fn leaf(&self) -> NodeId {
        match *self {
            UpdatePath::Replaced { leaf, .. } | UpdatePath::Grew { leaf, .. } => leaf,
        }
    }
}

impl<H: MerkleHasher> MerkleTree<H> {
    /// Add one content item.
    ///
    /// Replacing a padding leaf costs one leaf hash plus one hash per level.
    /// Growing costs one hash per new leaf slot but only happens when the leaf
    /// count crosses a power of two.
    pub fn add_item(&mut self, content: impl Into<Vec<u8>>) -> CostResult<UpdatePath, Error> {
        let content = content.into();
        let slot = self
            .leaves()
            .enumerate()
            .find(|(_, (_, node))| node.is_padding)
            .map(|(position, (id, _))| (position, id));
        match slot {
            Some((position, leaf)) => self.replace_padding(leaf, position, content),
            None => self.grow(content),
        }
    }

    fn replace_padding(
        &mut self,
        leaf: NodeId,
        position: usize,
        content: Vec<u8>,
    ) -> CostResult<UpdatePath, Error> {
        let mut cost = OperationCost::default();
        let ancestors = cost_return_on_error_no_add!(&cost, self.ancestors(leaf));

        let hash = H::hash_bytes(&content);
        cost.hash_byte_calls += 1;
        let old_hash = {
            let node = &mut self.nodes[leaf.0];
            let old_hash = node.hash;
            node.hash = hash;
            node.content = content.clone();
            node.is_padding = false;
            old_hash
        };
        self.inputs[position] = content;

        if self.index.forget(&old_hash, leaf) {
            let other = self
                .leaves()
                .find(|(_, node)| node.hash == old_hash)
                .map(|(id, _)| id);
            if let Some(other) = other {
                self.index.record(old_hash, other);
            }
        }
        self.index.record(hash, leaf);

        for parent_id in ancestors {
            self.rehash(parent_id);
            cost.hash_node_calls += 1;
        }
        debug!(
            "filled padding leaf {leaf} at position {position}, root {}",
            self.root_hash()
        );
        Ok(UpdatePath::Replaced { leaf, position }).wrap_with_cost(cost)
    }

    /// Ancestors of `from`, nearest first, ending at the root.
    ///
    /// Fails without touching the tree if a parent does not hold the node on
    /// the side it claims, or if the chain ends anywhere but the root.
    fn ancestors(&self, from: NodeId) -> Result<Vec<NodeId>> {
        let mut chain = Vec::new();
        let mut current = from;
        loop {
            let node = self.get(current)?;
            let Some(parent_id) = node.parent else {
                break;
            };
            let (left, right) = self.get(parent_id)?.children.ok_or_else(|| {
                Error::InvalidStructure(format!("parent {parent_id} of {current} is a leaf"))
            })?;
            let held = match node.side {
                Side::Left => left == current,
                Side::Right => right == current,
                Side::Undefined => false,
            };
            if !held {
                return Err(Error::InvalidStructure(format!(
                    "node {current} claims side {:?} of {parent_id}, which does not hold it \
                     there",
                    node.side
                )));
            }
            self.get(left)?;
            self.get(right)?;
            if chain.len() >= self.nodes.len() {
                return Err(Error::InvalidStructure(format!(
                    "parent links from {from} form a cycle"
                )));
            }
            chain.push(parent_id);
            current = parent_id;
        }
        if current != self.root {
            return Err(Error::InvalidStructure(format!(
                "ancestors of {from} end at {current}, root is {}",
                self.root
            )));
        }
        Ok(chain)
    }

    /// Recompute hash and content of an internal node whose children were
    /// checked by [`MerkleTree::ancestors`].
    fn rehash(&mut self, id: NodeId) {
        let Some((left, right)) = self.nodes[id.0].children else {
            return;
        };
        let l = &self.nodes[left.0];
        let r = &self.nodes[right.0];
        let hash = H::hash_children(&l.hash, &r.hash);
        let content = self.config.join_content(&l.content, &r.content);
        let parent = &mut self.nodes[id.0];
        parent.hash = hash;
        parent.content = content;
        trace!("rehashed {id}: {hash}");
    }

    fn grow(&mut self, content: Vec<u8>) -> CostResult<UpdatePath, Error> {
        let cost = OperationCost::default();
        let leaf_count = self.leaf_count();
        if !leaf_count.is_power_of_two() {
            return Err(Error::InvalidStructure(format!(
                "no padding leaf left but leaf count {leaf_count} is not a power of two"
            )))
            .wrap_with_cost(cost);
        }
        let old_root = self.root;
        cost_return_on_error_no_add!(&cost, self.get(old_root));

        let mut builder = TreeBuilder::<H>::new(&mut self.nodes, &self.config);
        let genuine = builder.leaf(content.clone());
        let mut slots = Vec::with_capacity(leaf_count);
        slots.push(genuine);
        for _ in 1..leaf_count {
            slots.push(builder.padding_copy(genuine));
        }
        let subtree = builder.reduce(slots);
        let new_root = builder.join(old_root, subtree);
        let cost = builder.finish();

        let new_leaves: Vec<_> = self
            .leaves_under(subtree)
            .map(|(id, node)| (id, node.hash))
            .collect();
        for (id, hash) in new_leaves {
            self.index.record(hash, id);
        }
        self.inputs.extend(std::iter::repeat(content).take(leaf_count));
        self.root = new_root;

        debug!(
            "grew tree to {} leaves, depth {}, root {}",
            self.leaf_count(),
            self.depth(),
            self.root_hash()
        );
        Ok(UpdatePath::Grew {
            leaf: genuine,
            position: leaf_count,
            root: new_root,
        })
        .wrap_with_cost(cost)
    }
}
