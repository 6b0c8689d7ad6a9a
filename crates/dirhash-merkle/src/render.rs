//! Human-readable tree rendering.

use std::fmt;

use crate::binary::{BinaryMerkleTree, NodeIndex, NodeKind};

const BRANCH: &str = "├──";
const LAST_BRANCH: &str = "└──";
const PIPE_INDENT: &str = "│   ";
const SPACE_INDENT: &str = "    ";

/// Pre-order rendering of a tree with ASCII connectors.
///
/// Every node prints as `<prefix><connector> [<label>] <digest>`, where the
/// label is `Leaf: "<data>"` or `Internal`. Left children use `├──`, right
/// children `└──`. A self-paired node lists its child twice.
pub struct TreeDisplay<'a> {
    tree: &'a BinaryMerkleTree,
}

impl<'a> TreeDisplay<'a> {
    pub fn new(tree: &'a BinaryMerkleTree) -> Self {
        Self { tree }
    }

    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        index: NodeIndex,
        prefix: &str,
        is_left: bool,
    ) -> fmt::Result {
        let Some(node) = self.tree.node(index) else {
            return Ok(());
        };

        let branch = if is_left { BRANCH } else { LAST_BRANCH };
        match node.kind() {
            NodeKind::Leaf { data } => writeln!(
                f,
                "{}{} [Leaf: {:?}] {}",
                prefix,
                branch,
                String::from_utf8_lossy(data),
                node.hash()
            ),
            NodeKind::Internal { left, right } => {
                writeln!(f, "{}{} [Internal] {}", prefix, branch, node.hash())?;
                let child_prefix = format!(
                    "{}{}",
                    prefix,
                    if is_left { PIPE_INDENT } else { SPACE_INDENT }
                );
                self.write_node(f, *left, &child_prefix, true)?;
                self.write_node(f, *right, &child_prefix, false)
            }
        }
    }
}

impl fmt::Display for TreeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.tree.root_index(), "", true)
    }
}

impl BinaryMerkleTree {
    /// Render the tree for terminal output.
    pub fn display(&self) -> TreeDisplay<'_> {
        TreeDisplay::new(self)
    }
}
