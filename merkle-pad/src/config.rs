//! Tree construction options.

/// Options shared by construction, updates and verification rebuilds.
///
/// None of these affect hashes: internal content is diagnostic only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Separator placed between the children's contents of an internal node.
    pub content_delimiter: Vec<u8>,
    /// Keep the joined content on internal nodes. With `false` internal nodes
    /// carry empty content, which keeps memory linear in the input size.
    pub retain_internal_content: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            content_delimiter: b"+".to_vec(),
            retain_internal_content: true,
        }
    }
}

impl TreeConfig {
    /// Use `delimiter` to join internal content.
    pub fn with_content_delimiter(mut self, delimiter: impl Into<Vec<u8>>) -> Self {
        self.content_delimiter = delimiter.into();
        self
    }

    /// Enable or disable internal content retention.
    pub fn with_retain_internal_content(mut self, retain: bool) -> Self {
        self.retain_internal_content = retain;
        self
    }

    pub(crate) fn join_content(&self, left: &[u8], right: &[u8]) -> Vec<u8> {
        if !self.retain_internal_content {
            return Vec::new();
        }
        let mut joined =
            Vec::with_capacity(left.len() + self.content_delimiter.len() + right.len());
        joined.extend_from_slice(left);
        joined.extend_from_slice(&self.content_delimiter);
        joined.extend_from_slice(right);
        joined
    }
}
