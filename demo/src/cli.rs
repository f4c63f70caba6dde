use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use merkle_pad::FsSource;

/// Items used when none are given on the command line.
const DEFAULT_ITEMS: [&str; 2] = ["Lorem Impsum Mahio", ""];

/// Digest algorithm for leaves and internal nodes.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// SHA-256
    Sha256,
    /// Blake3, 256-bit output
    Blake3,
}

/// Build a padded Merkle tree, print it and query it.
#[derive(Parser, Debug, Clone)]
#[command(name = "merkle-pad-demo", version)]
pub struct DemoCli {
    /// Content items. With --files every item is a path whose file content
    /// becomes the leaf.
    pub items: Vec<String>,

    /// Treat items, --add and --verify values as file paths
    #[arg(long)]
    pub files: bool,

    /// Directory relative paths are resolved against
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Items appended after construction, one update each
    #[arg(long = "add")]
    pub add: Vec<String>,

    /// Items whose inclusion is checked against the final tree
    #[arg(long = "verify")]
    pub verify: Vec<String>,

    /// Fail unless the final root hash equals this hex digest
    #[arg(long)]
    pub expect_root: Option<String>,

    /// Hash algorithm for leaves and internal nodes
    #[arg(long, value_enum, default_value_t = HashAlgorithm::Sha256)]
    pub hasher: HashAlgorithm,

    /// Separator shown between joined contents of internal nodes
    #[arg(long, default_value = "+")]
    pub delimiter: String,

    /// Skip the node-by-node tree dump
    #[arg(long)]
    pub no_dump: bool,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl DemoCli {
    pub fn items(&self) -> Vec<String> {
        if self.items.is_empty() {
            DEFAULT_ITEMS.iter().map(|s| s.to_string()).collect()
        } else {
            self.items.clone()
        }
    }

    pub fn file_source(&self) -> FsSource {
        self.base_dir
            .clone()
            .map(FsSource::with_base)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_every_flag_is_described() {
        let help = DemoCli::command().render_help().to_string();
        assert!(help.contains("Hash algorithm for leaves and internal nodes"));
        assert!(help.contains("Skip the node-by-node tree dump"));
    }

    #[test]
    fn test_defaults_reproduce_sample_input() {
        let cli = DemoCli::parse_from(["merkle-pad-demo"]);
        assert_eq!(cli.items(), vec!["Lorem Impsum Mahio".to_string(), String::new()]);
        assert_eq!(cli.hasher, HashAlgorithm::Sha256);
        assert_eq!(cli.delimiter, "+");
        assert!(!cli.files);
    }

    #[test]
    fn test_repeated_flags_collect() {
        let cli = DemoCli::parse_from([
            "merkle-pad-demo",
            "a",
            "b",
            "--add",
            "c",
            "--add",
            "d",
            "--verify",
            "a",
            "--hasher",
            "blake3",
        ]);
        assert_eq!(cli.items(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(cli.add, vec!["c".to_string(), "d".to_string()]);
        assert_eq!(cli.verify, vec!["a".to_string()]);
        assert_eq!(cli.hasher, HashAlgorithm::Blake3);
    }
}
