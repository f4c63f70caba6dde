//! Independent digest helpers and invariant checks for tests.

use sha2::{Digest as _, Sha256};

use crate::{MerkleHasher, MerkleTree, Sha256MerkleTree};

/// SHA-256 of raw bytes as lowercase hex, computed without the crate's
/// hashing code.
pub(crate) fn sha_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Expected leaf digest.
pub(crate) fn leaf(content: &str) -> String {
    sha_hex(content.as_bytes())
}

/// Expected internal digest over two hex digests.
pub(crate) fn node(left: &str, right: &str) -> String {
    sha_hex(format!("{left}{right}").as_bytes())
}

/// `n` single-letter items starting at `a`.
pub(crate) fn letters(n: u8) -> Vec<String> {
    (0..n).map(|i| char::from(b'a' + i).to_string()).collect()
}

pub(crate) fn tree_of(items: &[&str]) -> Sha256MerkleTree {
    Sha256MerkleTree::from_contents(items.iter().map(|s| s.as_bytes().to_vec())).unwrap()
}

/// Leaf contents left to right, as owned strings.
pub(crate) fn leaf_strings<H: MerkleHasher>(tree: &MerkleTree<H>) -> Vec<String> {
    tree.leaf_contents()
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect()
}

/// Rebuild over the current leaf contents.
pub(crate) fn rebuild<H: MerkleHasher>(tree: &MerkleTree<H>) -> MerkleTree<H> {
    MerkleTree::<H>::from_contents_with_config(
        tree.leaf_contents().map(<[u8]>::to_vec).collect::<Vec<_>>(),
        tree.config().clone(),
    )
    .unwrap()
}

/// Structure, hash law, balance, index coverage and proof soundness.
pub(crate) fn assert_sound<H: MerkleHasher>(tree: &MerkleTree<H>) {
    tree.validate().unwrap().expect("tree should validate");
    assert!(tree.leaf_count().is_power_of_two());
    assert_eq!(tree.leaves().count(), tree.leaf_count());
    assert_eq!(tree.leaf_count(), 1 << tree.depth());
    assert_eq!(rebuild(tree).root_hash(), tree.root_hash());
    for (id, node) in tree.leaves() {
        assert!(tree.index().contains(&node.hash()));
        let proof = tree.generate_proof(id).unwrap().expect("proof for every leaf");
        proof
            .verify::<H>(&tree.root_hash())
            .expect("proof verifies against root");
    }
}
