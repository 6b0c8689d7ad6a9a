//! Binary Merkle tree over an ordered sequence of data blocks.
//!
//! Leaves hash their raw block with SHA-256 and internal nodes hash the
//! concatenation of their two child digests. The tree is built bottom-up one
//! level at a time. When a level holds an odd number of nodes, its last node
//! is paired with itself, so the resulting parent stores the same child index
//! on both sides:
//!
//! ```text
//!              root
//!            /      \
//!         H01        H22
//!        /   \      /   \
//!      L0    L1   L2 === L2
//! ```
//!
//! This differs from libraries that promote the unpaired node unchanged, and
//! therefore yields different roots for non power-of-two inputs.
//!
//! # Example
//!
//! ```
//! use dirhash_merkle::{verify_proof, BinaryMerkleTree};
//!
//! let tree = BinaryMerkleTree::build(&[b"a".to_vec(), b"b".to_vec()]).unwrap();
//! let proof = tree.generate_proof(b"a").unwrap();
//! assert!(verify_proof(b"a", &proof, &tree.root()));
//! ```

use crate::error::{MerkleError, MerkleResult};
use crate::hash::{hash_internal, hash_leaf, HashValue};
use crate::proof::{MerkleProof, ProofStep, Side};

/// Index of a node inside the tree's arena.
pub type NodeIndex = usize;

/// Payload of a tree node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A leaf owning the original block bytes
    Leaf { data: Vec<u8> },
    /// An internal node with two children; `left == right` for self-paired nodes
    Internal { left: NodeIndex, right: NodeIndex },
}

/// A node in the binary Merkle tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleNode {
    hash: HashValue,
    kind: NodeKind,
}

impl MerkleNode {
    fn leaf(data: Vec<u8>) -> Self {
        Self {
            hash: hash_leaf(&data),
            kind: NodeKind::Leaf { data },
        }
    }

    fn internal(left: NodeIndex, left_hash: &HashValue, right: NodeIndex, right_hash: &HashValue) -> Self {
        Self {
            hash: hash_internal(left_hash, right_hash),
            kind: NodeKind::Internal { left, right },
        }
    }

    pub fn hash(&self) -> HashValue {
        self.hash
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Block bytes for a leaf, `None` for internal nodes.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.kind {
            NodeKind::Leaf { data } => Some(data.as_slice()),
            NodeKind::Internal { .. } => None,
        }
    }

    /// Child indices for an internal node, `None` for leaves.
    pub fn children(&self) -> Option<(NodeIndex, NodeIndex)> {
        match self.kind {
            NodeKind::Internal { left, right } => Some((left, right)),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Whether this internal node pairs a single child with itself.
    pub fn is_self_paired(&self) -> bool {
        matches!(self.kind, NodeKind::Internal { left, right } if left == right)
    }
}

/// An immutable binary Merkle tree.
///
/// Nodes live in a single arena: all leaves first, in input order, followed by
/// each internal level bottom-up. The root is always the last node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMerkleTree {
    nodes: Vec<MerkleNode>,
    leaf_count: usize,
    height: usize,
}

impl BinaryMerkleTree {
    /// Build a tree from an ordered sequence of blocks.
    ///
    /// The root digest depends on block order, so callers must supply blocks
    /// in a deterministic order. Fails with [`MerkleError::InvalidInput`] when
    /// `blocks` is empty.
    pub fn build<B: AsRef<[u8]>>(blocks: &[B]) -> MerkleResult<Self> {
        Self::from_blocks(blocks.iter().map(|b| b.as_ref().to_vec()))
    }

    /// Build a tree taking ownership of the blocks.
    pub fn from_blocks<I>(blocks: I) -> MerkleResult<Self>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let mut nodes: Vec<MerkleNode> = blocks.into_iter().map(MerkleNode::leaf).collect();
        let leaf_count = nodes.len();
        if leaf_count == 0 {
            return Err(MerkleError::InvalidInput(
                "cannot build a merkle tree from zero blocks".to_string(),
            ));
        }

        let mut level_start = 0;
        let mut level_len = leaf_count;
        let mut height = 0;

        while level_len > 1 {
            let next_start = nodes.len();
            let mut i = level_start;
            let level_end = level_start + level_len;
            while i < level_end {
                // Odd tail pairs with itself
                let right = if i + 1 < level_end { i + 1 } else { i };
                let node = MerkleNode::internal(i, &nodes[i].hash, right, &nodes[right].hash);
                nodes.push(node);
                i += 2;
            }
            level_start = next_start;
            level_len = nodes.len() - next_start;
            height += 1;
        }

        Ok(Self {
            nodes,
            leaf_count,
            height,
        })
    }

    /// Root digest of the tree.
    pub fn root(&self) -> HashValue {
        self.root_node().hash
    }

    pub fn root_index(&self) -> NodeIndex {
        self.nodes.len() - 1
    }

    pub fn root_node(&self) -> &MerkleNode {
        &self.nodes[self.root_index()]
    }

    /// Look up a node by arena index.
    pub fn node(&self, index: NodeIndex) -> Option<&MerkleNode> {
        self.nodes.get(index)
    }

    /// Number of leaves (equal to the number of input blocks).
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of distinct nodes, including self-paired parents.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of internal levels above the leaves. Zero for a single block.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Leaves in input order.
    pub fn leaves(&self) -> impl Iterator<Item = &MerkleNode> {
        self.nodes[..self.leaf_count].iter()
    }

    /// Block bytes of the leaves in input order.
    pub fn leaf_data(&self) -> impl Iterator<Item = &[u8]> {
        self.leaves().filter_map(MerkleNode::data)
    }

    /// Generate a membership proof for `target`.
    ///
    /// Searches depth-first, left subtree before right, for a leaf whose data
    /// equals `target`. When several leaves hold identical data the first one
    /// found in that order is proven. Returns `None` if no leaf matches.
    ///
    /// The search keeps an explicit stack of frames instead of recursing.
    pub fn generate_proof(&self, target: &[u8]) -> Option<MerkleProof> {
        let mut frames = vec![Frame::new(self.root_index())];

        while let Some(frame) = frames.last_mut() {
            match self.nodes[frame.node].kind {
                NodeKind::Leaf { ref data } => {
                    if data.as_slice() == target {
                        return Some(self.unwind(&frames));
                    }
                    frames.pop();
                }
                NodeKind::Internal { left, right } => match frame.descended {
                    None => {
                        frame.descended = Some(Side::Left);
                        frames.push(Frame::new(left));
                    }
                    // A self-paired node's right subtree was already searched as its left
                    Some(Side::Left) if right != left => {
                        frame.descended = Some(Side::Right);
                        frames.push(Frame::new(right));
                    }
                    Some(_) => {
                        frames.pop();
                    }
                },
            }
        }

        None
    }

    /// Turn the root-to-leaf frame stack into leaf-to-root proof steps.
    fn unwind(&self, frames: &[Frame]) -> MerkleProof {
        let steps = frames
            .iter()
            .rev()
            .skip(1)
            .filter_map(|frame| {
                let (left, right) = self.nodes[frame.node].children()?;
                let step = match frame.descended? {
                    Side::Left => ProofStep::new(self.nodes[right].hash, Side::Right),
                    Side::Right => ProofStep::new(self.nodes[left].hash, Side::Left),
                };
                Some(step)
            })
            .collect();
        MerkleProof::new(steps)
    }

    /// Whether any leaf holds exactly `data`.
    pub fn contains(&self, data: &[u8]) -> bool {
        self.leaf_data().any(|d| d == data)
    }
}

/// DFS frame: the node and which child (if any) was descended into last.
struct Frame {
    node: NodeIndex,
    descended: Option<Side>,
}

impl Frame {
    fn new(node: NodeIndex) -> Self {
        Self {
            node,
            descended: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256;
    use crate::proof::verify_proof;

    fn blocks(n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|i| format!("block{}", i).into_bytes()).collect()
    }

    #[test]
    fn test_empty_input_rejected() {
        let empty: Vec<Vec<u8>> = vec![];
        let err = BinaryMerkleTree::build(&empty).unwrap_err();
        assert!(matches!(err, MerkleError::InvalidInput(_)));
    }

    #[test]
    fn test_single_block() {
        let tree = BinaryMerkleTree::build(&[b"only".to_vec()]).unwrap();

        assert_eq!(tree.root(), sha256(b"only"));
        assert!(tree.root_node().is_leaf());
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.height(), 0);

        let proof = tree.generate_proof(b"only").unwrap();
        assert!(proof.is_empty());
        assert!(verify_proof(b"only", &proof, &tree.root()));
    }

    #[test]
    fn test_two_blocks_literal() {
        let tree = BinaryMerkleTree::build(&[b"a".to_vec(), b"b".to_vec()]).unwrap();
        let expected_root = hash_internal(&sha256(b"a"), &sha256(b"b"));
        assert_eq!(tree.root(), expected_root);

        let proof = tree.generate_proof(b"a").unwrap();
        assert_eq!(proof.steps(), &[ProofStep::new(sha256(b"b"), Side::Right)]);
        assert!(verify_proof(b"a", &proof, &expected_root));

        let proof = tree.generate_proof(b"b").unwrap();
        assert_eq!(proof.steps(), &[ProofStep::new(sha256(b"a"), Side::Left)]);
        assert!(verify_proof(b"b", &proof, &expected_root));
    }

    #[test]
    fn test_odd_level_self_pairing() {
        let tree = BinaryMerkleTree::build(&[b"x".to_vec(), b"y".to_vec(), b"z".to_vec()]).unwrap();

        let d0 = sha256(b"x");
        let d1 = sha256(b"y");
        let d2 = sha256(b"z");
        let expected = hash_internal(&hash_internal(&d0, &d1), &hash_internal(&d2, &d2));
        assert_eq!(tree.root(), expected);

        // 3 leaves + 2 parents + root
        assert_eq!(tree.node_count(), 6);
        assert_eq!(tree.height(), 2);

        let self_paired: Vec<_> = (0..tree.node_count())
            .filter_map(|i| tree.node(i))
            .filter(|n| n.is_self_paired())
            .collect();
        assert_eq!(self_paired.len(), 1);
        assert_eq!(self_paired[0].children(), Some((2, 2)));
    }

    #[test]
    fn test_self_paired_leaf_proof() {
        let tree = BinaryMerkleTree::build(&blocks(3)).unwrap();
        let proof = tree.generate_proof(b"block2").unwrap();

        // Sibling of a self-paired leaf is itself, on the right
        assert_eq!(proof.len(), 2);
        assert_eq!(proof.steps()[0], ProofStep::new(sha256(b"block2"), Side::Right));
        assert_eq!(proof.steps()[1].side, Side::Left);
        assert!(verify_proof(b"block2", &proof, &tree.root()));
    }

    #[test]
    fn test_node_counts_follow_level_rounding() {
        // n leaves, then ceil(n/2) per level until one node remains
        for (n, expected_nodes, expected_height) in [
            (1, 1, 0),
            (2, 3, 1),
            (3, 6, 2),
            (4, 7, 2),
            (5, 11, 3),
            (6, 12, 3),
            (7, 14, 3),
            (8, 15, 3),
            (9, 20, 4),
        ] {
            let tree = BinaryMerkleTree::build(&blocks(n)).unwrap();
            assert_eq!(tree.leaf_count(), n);
            assert_eq!(tree.node_count(), expected_nodes, "node count for n={}", n);
            assert_eq!(tree.height(), expected_height, "height for n={}", n);
        }
    }

    #[test]
    fn test_leaves_keep_input_order() {
        let input = blocks(7);
        let tree = BinaryMerkleTree::build(&input).unwrap();
        let leaves: Vec<Vec<u8>> = tree.leaf_data().map(|d| d.to_vec()).collect();
        assert_eq!(leaves, input);
        assert!(tree.leaves().all(MerkleNode::is_leaf));
        assert!(tree.nodes[tree.leaf_count()..].iter().all(|n| n.data().is_none()));
    }

    #[test]
    fn test_deterministic_root() {
        let tree1 = BinaryMerkleTree::build(&blocks(10)).unwrap();
        let tree2 = BinaryMerkleTree::build(&blocks(10)).unwrap();
        assert_eq!(tree1.root(), tree2.root());
    }

    #[test]
    fn test_order_sensitive_root() {
        let mut reversed = blocks(4);
        reversed.reverse();
        let tree1 = BinaryMerkleTree::build(&blocks(4)).unwrap();
        let tree2 = BinaryMerkleTree::build(&reversed).unwrap();
        assert_ne!(tree1.root(), tree2.root());

        let mut swapped = blocks(5);
        swapped.swap(3, 4);
        let tree3 = BinaryMerkleTree::build(&blocks(5)).unwrap();
        let tree4 = BinaryMerkleTree::build(&swapped).unwrap();
        assert_ne!(tree3.root(), tree4.root());
    }

    #[test]
    fn test_proof_for_every_leaf() {
        for n in 1..=17 {
            let input = blocks(n);
            let tree = BinaryMerkleTree::build(&input).unwrap();
            let root = tree.root();
            for block in &input {
                let proof = tree.generate_proof(block).unwrap();
                assert_eq!(proof.len(), tree.height());
                assert!(verify_proof(block, &proof, &root), "n={} block={:?}", n, block);
            }
        }
    }

    #[test]
    fn test_absent_target_not_found() {
        let tree = BinaryMerkleTree::build(&blocks(5)).unwrap();
        assert!(tree.generate_proof(b"missing").is_none());
        assert!(!tree.contains(b"missing"));
        assert!(tree.contains(b"block4"));
    }

    #[test]
    fn test_duplicate_leaves_prove_first_match() {
        let input = vec![b"dup".to_vec(), b"other".to_vec(), b"dup".to_vec(), b"tail".to_vec()];
        let tree = BinaryMerkleTree::build(&input).unwrap();
        let proof = tree.generate_proof(b"dup").unwrap();

        // Leaf 0 is found first, so its sibling is leaf 1
        assert_eq!(proof.steps()[0], ProofStep::new(sha256(b"other"), Side::Right));
        assert!(verify_proof(b"dup", &proof, &tree.root()));
    }

    #[test]
    fn test_empty_block_is_a_valid_leaf() {
        let tree = BinaryMerkleTree::build(&[Vec::new(), b"x".to_vec()]).unwrap();
        let proof = tree.generate_proof(b"").unwrap();
        assert!(verify_proof(b"", &proof, &tree.root()));
    }
}
