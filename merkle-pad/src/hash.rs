//! Digests and the hash algorithms that produce them.
//!
//! Leaves hash their raw content. Internal nodes hash the *text* of their
//! children's digests: `H(hex(left) || hex(right))`, lowercase hex, left
//! first. Root hashes stay comparable with trees built by other tools that
//! follow the same textual convention.

use std::{fmt, str::FromStr};

use sha2::{Digest as _, Sha256};

use crate::Error;

/// Size in bytes of every digest in the tree.
pub const DIGEST_LEN: usize = 32;

/// A fixed-size 256-bit digest, rendered as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Wrap raw digest bytes.
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest(bytes)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex rendering, the form hashed by internal nodes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 64 character hex string.
    pub fn from_hex(text: &str) -> Result<Self, Error> {
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(text.trim(), &mut bytes)
            .map_err(|e| Error::InvalidDigest(format!("{text:?}: {e}")))?;
        Ok(Digest(bytes))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Digest::from_hex(s)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A deterministic one-way hash used for every node of a tree.
///
/// Implementors only provide [`MerkleHasher::hash_bytes`]; the internal node
/// rule is shared so that every algorithm follows the same hex concatenation
/// convention.
pub trait MerkleHasher {
    /// Short algorithm name, used in logs and tree dumps.
    const NAME: &'static str;

    /// Digest of raw bytes.
    fn hash_bytes(data: &[u8]) -> Digest;

    /// Digest of an internal node: `H(hex(left) || hex(right))`.
    fn hash_children(left: &Digest, right: &Digest) -> Digest {
        let mut text = String::with_capacity(DIGEST_LEN * 4);
        text.push_str(&left.to_hex());
        text.push_str(&right.to_hex());
        Self::hash_bytes(text.as_bytes())
    }
}

/// SHA-256, the default algorithm.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sha256Hasher;

impl MerkleHasher for Sha256Hasher {
    const NAME: &'static str = "sha256";

    fn hash_bytes(data: &[u8]) -> Digest {
        let mut out = [0u8; DIGEST_LEN];
        out.copy_from_slice(&Sha256::digest(data));
        Digest(out)
    }
}

/// Blake3 in its default 256-bit mode.
#[cfg(feature = "blake3")]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Blake3Hasher;

#[cfg(feature = "blake3")]
impl MerkleHasher for Blake3Hasher {
    const NAME: &'static str = "blake3";

    fn hash_bytes(data: &[u8]) -> Digest {
        Digest(*blake3::hash(data).as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        // sha256("abc")
        assert_eq!(
            Sha256Hasher::hash_bytes(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_children_hash_uses_hex_text() {
        let left = Sha256Hasher::hash_bytes(b"a");
        let right = Sha256Hasher::hash_bytes(b"b");
        let text = format!("{}{}", left.to_hex(), right.to_hex());
        assert_eq!(
            Sha256Hasher::hash_children(&left, &right),
            Sha256Hasher::hash_bytes(text.as_bytes())
        );
        // byte-level concatenation is a different digest
        let mut raw = left.as_bytes().to_vec();
        raw.extend_from_slice(right.as_bytes());
        assert_ne!(
            Sha256Hasher::hash_children(&left, &right),
            Sha256Hasher::hash_bytes(&raw)
        );
    }

    #[test]
    fn test_hex_roundtrip_and_errors() {
        let digest = Sha256Hasher::hash_bytes(b"roundtrip");
        let parsed: Digest = digest.to_hex().parse().expect("valid hex");
        assert_eq!(parsed, digest);
        assert!(Digest::from_hex("abcd").is_err());
        assert!(Digest::from_hex(&"zz".repeat(32)).is_err());
    }

    #[cfg(feature = "blake3")]
    #[test]
    fn test_blake3_matches_crate() {
        assert_eq!(
            Blake3Hasher::hash_bytes(b"leaf").as_bytes(),
            blake3::hash(b"leaf").as_bytes()
        );
        assert_ne!(
            Blake3Hasher::hash_bytes(b"leaf"),
            Sha256Hasher::hash_bytes(b"leaf")
        );
    }
}
