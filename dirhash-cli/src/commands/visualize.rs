//! Visualize command handler

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use dirhash_merkle::BinaryMerkleTree;

use super::load_tree;

pub fn handle(folder: &Path) -> Result<()> {
    let tree = load_tree(folder)?;
    print!("{} {}", "→".cyan().bold(), visualization(&tree));
    Ok(())
}

/// Header line followed by the rendered tree, nothing else.
fn visualization(tree: &BinaryMerkleTree) -> String {
    format!("Merkle Tree Visualization:\n{}", tree.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_then_tree_only() {
        let tree = BinaryMerkleTree::build(&["a", "b", "c"]).unwrap();
        let out = visualization(&tree);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "Merkle Tree Visualization:");
        assert_eq!(lines[1..].join("\n"), tree.display().to_string().trim_end());
        // 6 nodes, the self-paired leaf printed twice
        assert_eq!(lines.len(), 1 + 7);
    }
}
