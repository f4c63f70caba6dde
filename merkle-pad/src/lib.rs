//! Balanced Merkle tree with padding-leaf reuse.
//!
//! A tree is built over an ordered list of content items. Leaves hash their
//! content; internal nodes hash the hex text of their two children's digests.
//! Odd-sized lists are padded by duplicating their last leaf at every level
//! of the recursive halving, so all leaves end up at the same depth.
//!
//! Those padding leaves double as free slots: [`MerkleTree::add_item`] fills
//! the leftmost one and rehashes only its ancestors. When none is left the
//! tree grows a second subtree of equal size under a new root.
//!
//! # Core types
//!
//! - [`MerkleTree`] — build, root hash, proofs, updates, verification.
//! - [`Node`] / [`NodeId`] — arena vertices and their handles.
//! - [`InclusionProof`] — leaf-to-root proof, verifiable without the tree.
//! - [`TreeIndex`] — leaf hash → leaf lookup.
//! - [`ContentSource`] — where content bytes come from ([`FsSource`],
//!   [`InlineSource`], [`MapSource`]).
//!
//! Operations that hash or read report their work as a
//! [`CostResult`]/[`CostContext`], see [`OperationCost`].

#![warn(missing_docs)]

pub(crate) mod builder;
mod config;
mod error;
mod hash;
mod index;
mod node;
mod proof;
mod source;
mod tree;
mod update;
pub mod visualize;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::TreeConfig;
pub use error::{Error, Result};
#[cfg(feature = "blake3")]
pub use hash::Blake3Hasher;
pub use hash::{Digest, MerkleHasher, Sha256Hasher, DIGEST_LEN};
pub use index::TreeIndex;
pub use merkle_pad_costs::{CostContext, CostResult, CostsExt, OperationCost};
pub use node::{Node, NodeId, Side};
pub use proof::{InclusionProof, ProofStep};
pub use source::{ContentSource, FsSource, InlineSource, MapSource};
#[cfg(feature = "blake3")]
pub use tree::Blake3MerkleTree;
pub use tree::{Leaves, MerkleTree, Sha256MerkleTree};
pub use update::UpdatePath;
