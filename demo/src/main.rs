//! Build a tree from literal items or files, dump it, apply updates and
//! answer inclusion queries.

mod cli;

use std::{error::Error, path::Path};

use clap::Parser;
use cli::{DemoCli, HashAlgorithm};
use log::info;
use merkle_pad::{
    visualize::{render_content, visualize_stdout},
    Blake3Hasher, ContentSource, Digest, InclusionProof, InlineSource, MerkleHasher, MerkleTree,
    OperationCost, Sha256Hasher, TreeConfig, UpdatePath,
};

type DemoResult<T> = Result<T, Box<dyn Error>>;

fn main() -> DemoResult<()> {
    let cli = DemoCli::parse();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(cli.log_level.as_str()));

    let expected_root = cli
        .expect_root
        .as_deref()
        .map(Digest::from_hex)
        .transpose()?;
    match cli.hasher {
        HashAlgorithm::Sha256 => run::<Sha256Hasher>(&cli, expected_root),
        HashAlgorithm::Blake3 => run::<Blake3Hasher>(&cli, expected_root),
    }
}

fn run<H: MerkleHasher>(cli: &DemoCli, expected_root: Option<Digest>) -> DemoResult<()> {
    let mut cost = OperationCost::default();
    let config = TreeConfig::default().with_content_delimiter(cli.delimiter.as_str());
    let files = cli.file_source();
    let items = cli.items();

    println!("Inputs: ");
    println!("{}", items.join(" | "));
    println!();

    let mut tree = if cli.files {
        MerkleTree::<H>::new_with_config(&files, items.iter().map(Path::new), config)
    } else {
        MerkleTree::<H>::new_with_config(&InlineSource, &items, config)
    }
    .unwrap_add_cost(&mut cost)?;
    print_tree(&tree, cli.no_dump)?;

    if !cli.add.is_empty() {
        for item in &cli.add {
            let content = if cli.files {
                files.read(Path::new(item))?
            } else {
                item.as_bytes().to_vec()
            };
            match tree.add_item(content).unwrap_add_cost(&mut cost)? {
                UpdatePath::Replaced { position, .. } => {
                    println!("Added {item:?} at position {position}, replacing padding")
                }
                UpdatePath::Grew { position, .. } => println!(
                    "Added {item:?} at position {position}, tree grew to {} leaves",
                    tree.leaf_count()
                ),
            }
        }
        println!();
        print_tree(&tree, cli.no_dump)?;
    }

    for query in &cli.verify {
        let result = if cli.files {
            tree.verify_inclusion(&files, Path::new(query))
        } else {
            tree.verify_inclusion(&InlineSource, query.as_str())
        }
        .unwrap_add_cost(&mut cost);
        match result {
            Ok(proof) => {
                proof.verify::<H>(&tree.root_hash())?;
                print_proof(query, &proof);
            }
            Err(merkle_pad::Error::NotFound(hash)) => {
                println!("{query:?} is not in the tree (leaf hash {hash})")
            }
            Err(e) => return Err(e.into()),
        }
    }

    let sound = tree.verify_tree().unwrap_add_cost(&mut cost);
    println!("Tree verification: {}", if sound { "passed" } else { "failed" });
    info!("total work: {cost:?}");

    if let Some(expected) = expected_root {
        if expected != tree.root_hash() {
            return Err(format!(
                "root hash mismatch: expected {expected}, got {}",
                tree.root_hash()
            )
            .into());
        }
        println!("Root hash matches {expected}");
    }
    if !sound {
        return Err("tree verification failed".into());
    }
    Ok(())
}

fn print_tree<H: MerkleHasher>(tree: &MerkleTree<H>, no_dump: bool) -> DemoResult<()> {
    if no_dump {
        println!("Root Hash ({}): {}", H::NAME, tree.root_hash());
        println!();
    } else {
        visualize_stdout(tree)?;
    }
    Ok(())
}

fn print_proof(query: &str, proof: &InclusionProof) {
    println!("{query:?} is in the tree, {} levels below the root", proof.len());
    for (level, content) in proof.content_path().iter().enumerate() {
        println!("    {level}: {}", render_content(content));
    }
}
