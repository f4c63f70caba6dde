//! Error types for tree operations.

use std::io;

use thiserror::Error;

use crate::Digest;

/// Errors from Merkle tree construction, proofs and updates.
#[derive(Debug, Error)]
pub enum Error {
    /// A content source could not be read while building a tree. The whole
    /// construction fails, no partial tree is returned.
    #[error("content unavailable for item {index} ({id}): {source}")]
    ContentUnavailable {
        /// Position of the item in the input sequence.
        index: usize,
        /// Debug rendering of the item identifier.
        id: String,
        /// Underlying read failure.
        source: io::Error,
    },
    /// The queried content is not a leaf of the tree.
    #[error("content is not a leaf of the tree (leaf hash {0})")]
    NotFound(Digest),
    /// The content source of a membership query could not be read.
    #[error("failed to read queried content ({id}): {source}")]
    SourceRead {
        /// Debug rendering of the queried identifier.
        id: String,
        /// Underlying read failure.
        source: io::Error,
    },
    /// A proof walk recomputed a root different from the stored one.
    #[error("proof mismatch: stored root {expected}, recomputed {computed}")]
    ProofMismatch {
        /// Root hash stored in the tree.
        expected: Digest,
        /// Root hash recomputed from the leaf and its siblings.
        computed: Digest,
    },
    /// Parent/child linkage or hashes are inconsistent.
    #[error("invalid tree structure: {0}")]
    InvalidStructure(String),
    /// A standalone proof is malformed or does not lead to the expected root.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
    /// A digest could not be parsed.
    #[error("invalid digest: {0}")]
    InvalidDigest(String),
}

/// Alias for `core::result::Result<T, Error>`.
pub type Result<T> = core::result::Result<T, Error>;
