//! The tree: an arena of nodes, the root handle and the leaf index.

use std::{fmt, marker::PhantomData};

use log::{debug, warn};
use merkle_pad_costs::{cost_return_on_error_no_add, CostContext, CostResult, CostsExt, OperationCost};

use crate::{
    builder::TreeBuilder, ContentSource, Digest, Error, MerkleHasher, Node, NodeId, Result,
    Sha256Hasher, Side, TreeConfig, TreeIndex,
};

/// Balanced Merkle tree over an ordered list of content items.
///
/// Nodes live in an arena and refer to each other by [`NodeId`]; children
/// and parent links are plain indices, so walking up for proofs and down for
/// dumps needs no shared ownership. Mutation goes through `&mut self`; any
/// number of readers may share `&self`.
pub struct MerkleTree<H: MerkleHasher = Sha256Hasher> {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) index: TreeIndex,
    /// Content of every leaf slot, left to right, kept apart from the arena
    /// so that [`MerkleTree::verify_tree`] has an independent input.
    pub(crate) inputs: Vec<Vec<u8>>,
    pub(crate) config: TreeConfig,
    _hasher: PhantomData<H>,
}

/// Tree hashed with SHA-256.
pub type Sha256MerkleTree = MerkleTree<Sha256Hasher>;

/// Tree hashed with Blake3.
#[cfg(feature = "blake3")]
pub type Blake3MerkleTree = MerkleTree<crate::Blake3Hasher>;

impl<H: MerkleHasher> fmt::Debug for MerkleTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleTree")
            .field("hasher", &H::NAME)
            .field("root_hash", &self.root_hash())
            .field("leaf_count", &self.leaf_count())
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

impl<H: MerkleHasher> Clone for MerkleTree<H> {
    fn clone(&self) -> Self {
        MerkleTree {
            nodes: self.nodes.clone(),
            root: self.root,
            index: self.index.clone(),
            inputs: self.inputs.clone(),
            config: self.config.clone(),
            _hasher: PhantomData,
        }
    }
}

impl<H: MerkleHasher> MerkleTree<H> {
    /// Build a tree over in-memory content with the default configuration.
    pub fn from_contents<I, C>(items: I) -> CostContext<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        Self::from_contents_with_config(items, TreeConfig::default())
    }

    /// Build a tree over in-memory content.
    ///
    /// An odd number of items gets its last item duplicated as padding; an
    /// empty input builds the tree of a single empty item.
    pub fn from_contents_with_config<I, C>(items: I, config: TreeConfig) -> CostContext<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        let items: Vec<Vec<u8>> = items.into_iter().map(Into::into).collect();
        let item_count = items.len();
        let mut nodes = Vec::with_capacity(item_count * 4 + 3);
        let mut builder = TreeBuilder::<H>::new(&mut nodes, &config);
        let leaves = builder.leaves(items);
        let root = builder.reduce(leaves);
        let cost = builder.finish();

        let mut tree = MerkleTree {
            nodes,
            root,
            index: TreeIndex::default(),
            inputs: Vec::new(),
            config,
            _hasher: PhantomData,
        };
        let leaves: Vec<(NodeId, Digest, Vec<u8>)> = tree
            .leaves_under(root)
            .map(|(id, node)| (id, node.hash, node.content.clone()))
            .collect();
        for (id, hash, content) in leaves {
            tree.index.record(hash, id);
            tree.inputs.push(content);
        }
        debug!(
            "built {} tree over {} items: {} leaves, depth {}, root {}",
            H::NAME,
            item_count,
            tree.leaf_count(),
            tree.depth(),
            tree.root_hash()
        );
        tree.wrap_with_cost(cost)
    }

    /// Build a tree over the content behind `ids` with the default
    /// configuration.
    pub fn new<S, I, K>(source: &S, ids: I) -> CostResult<Self, Error>
    where
        S: ContentSource + ?Sized,
        I: IntoIterator<Item = K>,
        K: AsRef<S::Id>,
    {
        Self::new_with_config(source, ids, TreeConfig::default())
    }

    /// Build a tree over the content behind `ids`.
    ///
    /// Every item is read before anything is hashed; the first unreadable
    /// item fails the construction with [`Error::ContentUnavailable`].
    pub fn new_with_config<S, I, K>(source: &S, ids: I, config: TreeConfig) -> CostResult<Self, Error>
    where
        S: ContentSource + ?Sized,
        I: IntoIterator<Item = K>,
        K: AsRef<S::Id>,
    {
        let mut cost = OperationCost::default();
        let mut items = Vec::new();
        for (index, id) in ids.into_iter().enumerate() {
            let id = id.as_ref();
            let content = cost_return_on_error_no_add!(
                &cost,
                source.read(id).map_err(|err| Error::ContentUnavailable {
                    index,
                    id: format!("{id:?}"),
                    source: err,
                })
            );
            cost += OperationCost::with_content_read(content.len());
            items.push(content);
        }
        Self::from_contents_with_config(items, config)
            .map(Ok)
            .add_cost(cost)
    }

    /// Digest stored at the root.
    pub fn root_hash(&self) -> Digest {
        self.nodes[self.root.0].hash
    }

    /// Handle of the current root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The root node.
    pub fn root_node(&self) -> &Node {
        &self.nodes[self.root.0]
    }

    /// Node behind `id`, if it belongs to this tree.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub(crate) fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| Error::InvalidStructure(format!("node {id} is outside the arena")))
    }

    /// Total number of nodes, leaves and internal.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves, padding included. Always a power of two.
    pub fn leaf_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of edges between the root and any leaf.
    pub fn depth(&self) -> u32 {
        let mut depth = 0;
        let mut current = self.root;
        while let Some(left) = self.nodes.get(current.0).and_then(Node::left) {
            depth += 1;
            current = left;
        }
        depth
    }

    /// Leaves from left to right.
    pub fn leaves(&self) -> Leaves<'_> {
        self.leaves_under(self.root)
    }

    pub(crate) fn leaves_under(&self, top: NodeId) -> Leaves<'_> {
        Leaves {
            nodes: &self.nodes,
            stack: vec![top],
        }
    }

    /// Content of every leaf, left to right.
    pub fn leaf_contents(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.leaves().map(|(_, node)| node.content())
    }

    /// Leaf carrying `hash`.
    pub fn get_leaf(&self, hash: &Digest) -> Option<NodeId> {
        self.index.get(hash)
    }

    /// The leaf index.
    pub fn index(&self) -> &TreeIndex {
        &self.index
    }

    /// Configuration the tree was built with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Rebuild an independent tree from the recorded leaf inputs and compare
    /// its root with the stored one, then check the stored structure.
    ///
    /// Detects tampering with in-memory nodes after construction. The input
    /// list always has a power-of-two length, so the rebuild needs no padding
    /// and reproduces the exact shape, including after updates.
    pub fn verify_tree(&self) -> CostContext<bool> {
        let mut cost = OperationCost::default();
        let rebuilt = Self::from_contents_with_config(self.inputs.clone(), self.config.clone())
            .unwrap_add_cost(&mut cost);
        if rebuilt.root_hash() != self.root_hash() {
            warn!(
                "tree verification failed: stored root {}, rebuilt root {}",
                self.root_hash(),
                rebuilt.root_hash()
            );
            return false.wrap_with_cost(cost);
        }
        match self.validate().unwrap_add_cost(&mut cost) {
            Ok(()) => true.wrap_with_cost(cost),
            Err(e) => {
                warn!("tree verification failed: {e}");
                false.wrap_with_cost(cost)
            }
        }
    }

    /// Check every structural invariant and recompute every hash.
    ///
    /// Walks the whole tree: each internal node has two children pointing
    /// back at it from the right sides, every hash matches its content or
    /// children, all leaves sit at the same depth and the root is the only
    /// parentless node reached.
    pub fn validate(&self) -> CostResult<(), Error> {
        let mut cost = OperationCost::default();
        let root = cost_return_on_error_no_add!(&cost, self.get(self.root));
        if root.parent.is_some() {
            return Err(Error::InvalidStructure(format!(
                "root {} has a parent",
                self.root
            )))
            .wrap_with_cost(cost);
        }

        let mut leaf_depth = None;
        let mut stack = vec![(self.root, 0u32)];
        while let Some((id, depth)) = stack.pop() {
            let node = cost_return_on_error_no_add!(&cost, self.get(id));
            let expected = match node.children {
                None => {
                    if *leaf_depth.get_or_insert(depth) != depth {
                        return Err(Error::InvalidStructure(format!(
                            "leaf {id} at depth {depth}, other leaves at {}",
                            leaf_depth.unwrap_or_default()
                        )))
                        .wrap_with_cost(cost);
                    }
                    cost.hash_byte_calls += 1;
                    H::hash_bytes(&node.content)
                }
                Some((left, right)) => {
                    for (child, side) in [(left, Side::Left), (right, Side::Right)] {
                        let child_node = cost_return_on_error_no_add!(&cost, self.get(child));
                        if child_node.parent != Some(id) || child_node.side != side {
                            return Err(Error::InvalidStructure(format!(
                                "child {child} of {id} records parent {:?} on side {:?}",
                                child_node.parent, child_node.side
                            )))
                            .wrap_with_cost(cost);
                        }
                    }
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                    cost.hash_node_calls += 1;
                    H::hash_children(&self.nodes[left.0].hash, &self.nodes[right.0].hash)
                }
            };
            if expected != node.hash {
                return Err(Error::InvalidStructure(format!(
                    "node {id} stores hash {}, recomputed {}",
                    node.hash, expected
                )))
                .wrap_with_cost(cost);
            }
        }
        Ok(()).wrap_with_cost(cost)
    }
}

/// Depth-first, left-to-right iterator over leaves.
///
/// Links are trusted; use [`MerkleTree::validate`] to check them. A link
/// outside the arena panics in debug builds and is skipped otherwise.
pub struct Leaves<'a> {
    nodes: &'a [Node],
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            debug_assert!(
                id.0 < self.nodes.len(),
                "leaf walk reached node {id} outside the arena"
            );
            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };
            match node.children {
                None => return Some((id, node)),
                Some((left, right)) => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
            }
        }
        None
    }
}
