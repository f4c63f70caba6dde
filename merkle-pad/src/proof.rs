//! Inclusion proofs.
//!
//! A proof is produced by walking parent links from a leaf to the root,
//! folding the sibling digest in at every level. The walk recomputes the root
//! as it goes; a proof is only handed out if that recomputation agrees with
//! the stored root.
//!
//! The resulting [`InclusionProof`] is self-contained: [`InclusionProof::verify`]
//! needs no tree, only the expected root.

use log::warn;
use merkle_pad_costs::{cost_return_on_error, cost_return_on_error_no_add, CostResult, CostsExt, OperationCost};

use crate::{ContentSource, Digest, Error, MerkleHasher, MerkleTree, NodeId, Side};

/// One level of a proof: the sibling digest and the side it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofStep {
    /// Which side of the parent the sibling occupies.
    pub sibling_side: Side,
    /// Digest of the sibling.
    pub sibling: Digest,
}

/// Proof that a content item is a leaf of a tree with a given root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionProof {
    /// Content of the proved leaf.
    pub leaf_content: Vec<u8>,
    /// Sibling digests from the leaf level up to just below the root.
    pub steps: Vec<ProofStep>,
    /// Content of every node on the path, leaf first, root last.
    pub content_path: Vec<Vec<u8>>,
    /// Root the proof was generated against.
    pub root: Digest,
}

impl InclusionProof {
    /// Content of every node from the leaf up to the root.
    pub fn content_path(&self) -> &[Vec<u8>] {
        &self.content_path
    }

    /// Number of levels between leaf and root.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// `true` for a proof with no sibling steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Recompute the root from the leaf content and the sibling digests.
    pub fn compute_root<H: MerkleHasher>(&self) -> Result<Digest, Error> {
        let mut running = H::hash_bytes(&self.leaf_content);
        for (level, step) in self.steps.iter().enumerate() {
            running = match step.sibling_side {
                Side::Right => H::hash_children(&running, &step.sibling),
                Side::Left => H::hash_children(&step.sibling, &running),
                Side::Undefined => {
                    return Err(Error::InvalidProof(format!(
                        "step {level} has no sibling side"
                    )))
                }
            };
        }
        Ok(running)
    }

    /// Check the proof against `expected_root`.
    pub fn verify<H: MerkleHasher>(&self, expected_root: &Digest) -> Result<(), Error> {
        let computed = self.compute_root::<H>()?;
        if &computed != expected_root {
            return Err(Error::InvalidProof(format!(
                "root hash mismatch: expected {expected_root}, got {computed}"
            )));
        }
        Ok(())
    }
}

impl<H: MerkleHasher> MerkleTree<H> {
    /// Prove that `leaf` belongs to this tree.
    ///
    /// The running hash starts as `H(leaf content)`; at every level it is
    /// combined with the sibling on the other side. Reaching the root with a
    /// hash different from the stored root hash yields
    /// [`Error::ProofMismatch`], which means the tree was corrupted.
    pub fn generate_proof(&self, leaf: NodeId) -> CostResult<InclusionProof, Error> {
        let mut cost = OperationCost::default();
        let leaf_node = cost_return_on_error_no_add!(&cost, self.get(leaf));
        if !leaf_node.is_leaf() {
            return Err(Error::InvalidStructure(format!("node {leaf} is not a leaf")))
                .wrap_with_cost(cost);
        }

        let mut running = H::hash_bytes(&leaf_node.content);
        cost.hash_byte_calls += 1;
        let mut steps = Vec::new();
        let mut content_path = Vec::new();
        let mut current = leaf;
        loop {
            let node = cost_return_on_error_no_add!(&cost, self.get(current));
            let Some(parent_id) = node.parent else {
                content_path.push(node.content.clone());
                break;
            };
            let parent = cost_return_on_error_no_add!(&cost, self.get(parent_id));
            let step = match (node.side, parent.children) {
                (Side::Left, Some((left, right))) if left == current => ProofStep {
                    sibling_side: Side::Right,
                    sibling: cost_return_on_error_no_add!(&cost, self.get(right)).hash,
                },
                (Side::Right, Some((left, right))) if right == current => ProofStep {
                    sibling_side: Side::Left,
                    sibling: cost_return_on_error_no_add!(&cost, self.get(left)).hash,
                },
                (side, _) => {
                    return Err(Error::InvalidStructure(format!(
                        "node {current} claims side {side:?} of {parent_id}, which does not \
                         hold it there"
                    )))
                    .wrap_with_cost(cost);
                }
            };
            running = match step.sibling_side {
                Side::Right => H::hash_children(&running, &step.sibling),
                _ => H::hash_children(&step.sibling, &running),
            };
            cost.hash_node_calls += 1;
            steps.push(step);
            content_path.push(node.content.clone());
            current = parent_id;
        }

        if current != self.root {
            return Err(Error::InvalidStructure(format!(
                "walk from {leaf} ended at parentless node {current}, root is {}",
                self.root
            )))
            .wrap_with_cost(cost);
        }
        let expected = self.root_hash();
        if running != expected {
            warn!("proof for leaf {leaf} recomputed {running}, stored root {expected}");
            return Err(Error::ProofMismatch {
                expected,
                computed: running,
            })
            .wrap_with_cost(cost);
        }

        Ok(InclusionProof {
            leaf_content: leaf_node.content.clone(),
            steps,
            content_path,
            root: expected,
        })
        .wrap_with_cost(cost)
    }

    /// Prove membership of raw content.
    ///
    /// Returns [`Error::NotFound`] when no leaf carries `H(content)`.
    pub fn prove_content(&self, content: &[u8]) -> CostResult<InclusionProof, Error> {
        let mut cost = OperationCost::with_hash_byte_calls(1);
        let hash = H::hash_bytes(content);
        let Some(leaf) = self.index.get(&hash) else {
            return Err(Error::NotFound(hash)).wrap_with_cost(cost);
        };
        let proof = cost_return_on_error!(&mut cost, self.generate_proof(leaf));
        Ok(proof).wrap_with_cost(cost)
    }

    /// Read the content behind `id` and prove its membership.
    ///
    /// An unreadable source yields [`Error::SourceRead`], kept apart from
    /// [`Error::NotFound`] so that I/O faults do not pass for non-membership.
    pub fn verify_inclusion<S, K>(&self, source: &S, id: K) -> CostResult<InclusionProof, Error>
    where
        S: ContentSource + ?Sized,
        K: AsRef<S::Id>,
    {
        let mut cost = OperationCost::default();
        let id = id.as_ref();
        let content = cost_return_on_error_no_add!(
            &cost,
            source.read(id).map_err(|err| Error::SourceRead {
                id: format!("{id:?}"),
                source: err,
            })
        );
        cost += OperationCost::with_content_read(content.len());
        self.prove_content(&content).add_cost(cost)
    }
}
