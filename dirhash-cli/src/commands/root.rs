//! Root command handler

use std::path::Path;

use anyhow::Result;

use super::load_tree;

pub fn handle(folder: &Path) -> Result<()> {
    let tree = load_tree(folder)?;
    // Bare hex so the output can be fed to `proof`
    println!("{}", tree.root());
    Ok(())
}
