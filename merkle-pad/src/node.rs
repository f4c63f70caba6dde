//! Tree vertices and the handles that address them in the arena.

use std::fmt;

use crate::Digest;

/// Index of a node in its tree's arena.
///
/// Ids are stable for the lifetime of the tree: nodes are never removed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which child slot of its parent a node occupies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left child.
    Left,
    /// Right child.
    Right,
    /// Not attached to a parent (the root, or a node under construction).
    #[default]
    Undefined,
}

/// A tree vertex.
///
/// Leaves have no children; internal nodes always have both, so a node with a
/// single child cannot be represented.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) hash: Digest,
    pub(crate) content: Vec<u8>,
    pub(crate) children: Option<(NodeId, NodeId)>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) side: Side,
    pub(crate) is_padding: bool,
}

impl Node {
    pub(crate) fn leaf(content: Vec<u8>, hash: Digest) -> Self {
        Node {
            hash,
            content,
            children: None,
            parent: None,
            side: Side::Undefined,
            is_padding: false,
        }
    }

    pub(crate) fn internal(left: NodeId, right: NodeId, hash: Digest, content: Vec<u8>) -> Self {
        Node {
            hash,
            content,
            children: Some((left, right)),
            parent: None,
            side: Side::Undefined,
            is_padding: false,
        }
    }

    /// Unattached duplicate of this node flagged as padding.
    pub(crate) fn padding_copy(&self) -> Self {
        Node {
            hash: self.hash,
            content: self.content.clone(),
            children: self.children,
            parent: None,
            side: Side::Undefined,
            is_padding: true,
        }
    }

    /// Digest of the content (leaf) or of the two children (internal).
    pub fn hash(&self) -> Digest {
        self.hash
    }

    /// Raw content of a leaf, joined children content of an internal node.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// `true` when the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// `true` when the node was duplicated to balance an odd level and has not
    /// been overwritten since.
    pub fn is_padding(&self) -> bool {
        self.is_padding
    }

    /// `(left, right)` children of an internal node.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.children
    }

    /// Left child.
    pub fn left(&self) -> Option<NodeId> {
        self.children.map(|(left, _)| left)
    }

    /// Right child.
    pub fn right(&self) -> Option<NodeId> {
        self.children.map(|(_, right)| right)
    }

    /// Parent, `None` only for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Slot occupied in the parent.
    pub fn side(&self) -> Side {
        self.side
    }
}
