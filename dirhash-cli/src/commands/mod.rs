//! Command handlers

pub mod proof;
pub mod root;
pub mod visualize;
pub mod watch;

use std::path::Path;

use anyhow::{Context, Result};
use dirhash_core::Snapshot;
use dirhash_merkle::BinaryMerkleTree;
use tracing::info;

/// Snapshot `folder` and build its tree. Fails on unreadable or empty folders.
pub fn load_tree(folder: &Path) -> Result<BinaryMerkleTree> {
    let snapshot = Snapshot::read(folder)
        .with_context(|| format!("Error reading files in {}", folder.display()))?;
    let files = snapshot.len();
    let tree = snapshot
        .build_tree()
        .with_context(|| format!("Cannot build a Merkle tree for {}", folder.display()))?;
    info!(files, root = %tree.root(), "Merkle tree built");
    Ok(tree)
}
