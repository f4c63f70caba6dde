//! Pairwise reduction of an ordered leaf list into a balanced tree.
//!
//! Every list handed to [`TreeBuilder::reduce`] is first made even by
//! duplicating its last node, then split at `len / 2`. Both halves therefore
//! have equal length and the result is a perfect binary tree. The split point
//! fixes the tree shape, and with it the root hash.

use std::marker::PhantomData;

use merkle_pad_costs::OperationCost;

use crate::{MerkleHasher, Node, NodeId, Side, TreeConfig};

/// Builds nodes into an arena while accounting for hashing work.
pub(crate) struct TreeBuilder<'a, H> {
    nodes: &'a mut Vec<Node>,
    config: &'a TreeConfig,
    cost: OperationCost,
    _hasher: PhantomData<H>,
}

impl<'a, H: MerkleHasher> TreeBuilder<'a, H> {
    pub(crate) fn new(nodes: &'a mut Vec<Node>, config: &'a TreeConfig) -> Self {
        TreeBuilder {
            nodes,
            config,
            cost: OperationCost::default(),
            _hasher: PhantomData,
        }
    }

    /// Work done so far.
    pub(crate) fn finish(self) -> OperationCost {
        self.cost
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.cost.nodes_created += 1;
        id
    }

    /// New genuine leaf over `content`.
    pub(crate) fn leaf(&mut self, content: Vec<u8>) -> NodeId {
        let hash = H::hash_bytes(&content);
        self.cost.hash_byte_calls += 1;
        self.push(Node::leaf(content, hash))
    }

    /// Padding duplicate of `source`.
    pub(crate) fn padding_copy(&mut self, source: NodeId) -> NodeId {
        let copy = self.nodes[source.0].padding_copy();
        self.push(copy)
    }

    /// Leaves for `items`, padded to an even count. An empty input is treated
    /// as a single empty item.
    pub(crate) fn leaves(&mut self, items: Vec<Vec<u8>>) -> Vec<NodeId> {
        let mut leaves: Vec<NodeId> = if items.is_empty() {
            vec![self.leaf(Vec::new())]
        } else {
            items.into_iter().map(|item| self.leaf(item)).collect()
        };
        self.pad_to_even(&mut leaves);
        leaves
    }

    fn pad_to_even(&mut self, list: &mut Vec<NodeId>) {
        if list.len() % 2 == 1 {
            if let Some(&last) = list.last() {
                let copy = self.padding_copy(last);
                list.push(copy);
            }
        }
    }

    /// Reduce `list` to a single subtree root, left half before right half.
    ///
    /// `list` must not be empty.
    pub(crate) fn reduce(&mut self, mut list: Vec<NodeId>) -> NodeId {
        debug_assert!(!list.is_empty(), "cannot reduce an empty list");
        self.pad_to_even(&mut list);
        if list.len() == 2 {
            return self.join(list[0], list[1]);
        }
        let right_half = list.split_off(list.len() / 2);
        let left = self.reduce(list);
        let right = self.reduce(right_half);
        self.join(left, right)
    }

    /// New parent over `left` and `right`, wiring their back-references.
    pub(crate) fn join(&mut self, left: NodeId, right: NodeId) -> NodeId {
        let (hash, content) = {
            let l = &self.nodes[left.0];
            let r = &self.nodes[right.0];
            (
                H::hash_children(&l.hash, &r.hash),
                self.config.join_content(&l.content, &r.content),
            )
        };
        self.cost.hash_node_calls += 1;
        let parent = self.push(Node::internal(left, right, hash, content));
        self.attach(left, parent, Side::Left);
        self.attach(right, parent, Side::Right);
        parent
    }

    fn attach(&mut self, child: NodeId, parent: NodeId, side: Side) {
        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.side = side;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sha256Hasher;

    fn build(items: &[&str]) -> (Vec<Node>, NodeId, OperationCost) {
        let mut nodes = Vec::new();
        let config = TreeConfig::default();
        let mut builder = TreeBuilder::<Sha256Hasher>::new(&mut nodes, &config);
        let leaves = builder.leaves(items.iter().map(|s| s.as_bytes().to_vec()).collect());
        let root = builder.reduce(leaves);
        let cost = builder.finish();
        (nodes, root, cost)
    }

    #[test]
    fn test_two_leaves_base_case() {
        let (nodes, root, cost) = build(&["a", "b"]);
        assert_eq!(nodes.len(), 3);
        assert_eq!(cost.hash_byte_calls, 2);
        assert_eq!(cost.hash_node_calls, 1);
        let root = &nodes[root.0];
        assert_eq!(root.content(), b"a+b");
        let (l, r) = root.children().expect("internal");
        assert_eq!(nodes[l.0].side(), Side::Left);
        assert_eq!(nodes[r.0].side(), Side::Right);
        assert_eq!(nodes[l.0].parent(), Some(NodeId(2)));
    }

    #[test]
    fn test_six_leaves_pad_both_halves() {
        // 6 -> [3, 3] -> each padded to 4
        let (nodes, root, cost) = build(&["a", "b", "c", "d", "e", "f"]);
        let leaves = nodes.iter().filter(|n| n.is_leaf()).count();
        assert_eq!(leaves, 8);
        assert_eq!(nodes.iter().filter(|n| n.is_padding()).count(), 2);
        assert_eq!(cost.hash_byte_calls, 6);
        assert_eq!(cost.hash_node_calls, 7);
        assert_eq!(cost.nodes_created, 15);
        assert_eq!(nodes[root.0].content(), b"a+b+c+c+d+e+f+f");
    }

    #[test]
    fn test_empty_input_is_one_empty_item() {
        let (nodes, root, _) = build(&[]);
        assert_eq!(nodes.len(), 3);
        assert!(!nodes[0].is_padding());
        assert!(nodes[1].is_padding());
        assert_eq!(nodes[root.0].content(), b"+");
    }
}
