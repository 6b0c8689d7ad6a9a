//! Membership proofs and their verification.
//!
//! A proof is the list of sibling digests met on the way from a leaf up to
//! the root, each tagged with the side the sibling sits on. Verification
//! needs only the candidate block, the proof and a previously published root;
//! it never touches the tree.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hash::{hash_internal, hash_leaf, HashValue};

/// Position of a sibling relative to the node on the proof path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// One level of a membership proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Digest of the sibling subtree
    pub sibling: HashValue,
    /// Where the sibling sits when recombining
    pub side: Side,
}

impl ProofStep {
    pub fn new(sibling: HashValue, side: Side) -> Self {
        Self { sibling, side }
    }

    /// Combine the running digest with this step's sibling.
    pub fn apply(&self, current: &HashValue) -> HashValue {
        match self.side {
            Side::Left => hash_internal(&self.sibling, current),
            Side::Right => hash_internal(current, &self.sibling),
        }
    }
}

/// A membership proof, ordered from the leaf's sibling up to the level just
/// below the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerkleProof {
    steps: Vec<ProofStep>,
}

impl MerkleProof {
    pub fn new(steps: Vec<ProofStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<ProofStep> {
        self.steps
    }

    /// Number of steps; equals the tree height.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// An empty proof belongs to a single-block tree.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Recompute the root digest implied by `data` and this proof.
    pub fn compute_root(&self, data: &[u8]) -> HashValue {
        self.steps
            .iter()
            .fold(hash_leaf(data), |current, step| step.apply(&current))
    }

    /// Check that `data` is a member of the tree with root `expected_root`.
    pub fn verify(&self, data: &[u8], expected_root: &HashValue) -> bool {
        &self.compute_root(data) == expected_root
    }
}

impl From<Vec<ProofStep>> for MerkleProof {
    fn from(steps: Vec<ProofStep>) -> Self {
        Self::new(steps)
    }
}

impl<'a> IntoIterator for &'a MerkleProof {
    type Item = &'a ProofStep;
    type IntoIter = std::slice::Iter<'a, ProofStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Verify a membership proof against a known root digest.
///
/// Returns `true` only when recombining `candidate`'s digest with every step
/// reproduces `expected_root` byte for byte.
pub fn verify_proof(candidate: &[u8], proof: &MerkleProof, expected_root: &HashValue) -> bool {
    proof.verify(candidate, expected_root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256;

    #[test]
    fn test_empty_proof_checks_leaf_digest() {
        let proof = MerkleProof::default();
        assert!(proof.is_empty());
        assert!(verify_proof(b"solo", &proof, &sha256(b"solo")));
        assert!(!verify_proof(b"solo!", &proof, &sha256(b"solo")));
    }

    #[test]
    fn test_side_controls_concatenation_order() {
        let leaf = sha256(b"a");
        let sibling = sha256(b"b");

        let right = ProofStep::new(sibling, Side::Right);
        assert_eq!(right.apply(&leaf), hash_internal(&leaf, &sibling));

        let left = ProofStep::new(sibling, Side::Left);
        assert_eq!(left.apply(&leaf), hash_internal(&sibling, &leaf));
    }

    #[test]
    fn test_compute_root_folds_steps_in_order() {
        let s1 = sha256(b"s1");
        let s2 = sha256(b"s2");
        let proof = MerkleProof::new(vec![
            ProofStep::new(s1, Side::Right),
            ProofStep::new(s2, Side::Left),
        ]);

        let expected = hash_internal(&s2, &hash_internal(&sha256(b"x"), &s1));
        assert_eq!(proof.compute_root(b"x"), expected);
        assert!(proof.verify(b"x", &expected));
    }

    #[test]
    fn test_flipped_side_fails() {
        let root = hash_internal(&sha256(b"a"), &sha256(b"b"));
        let good = MerkleProof::new(vec![ProofStep::new(sha256(b"b"), Side::Right)]);
        let flipped = MerkleProof::new(vec![ProofStep::new(sha256(b"b"), Side::Left)]);

        assert!(verify_proof(b"a", &good, &root));
        assert!(!verify_proof(b"a", &flipped, &root));
    }

    #[test]
    fn test_proof_json_shape() {
        let proof = MerkleProof::new(vec![ProofStep::new(sha256(b"b"), Side::Right)]);
        let json = serde_json::to_value(&proof).unwrap();

        assert_eq!(json[0]["side"], "right");
        assert_eq!(json[0]["sibling"], sha256(b"b").to_hex());

        let back: MerkleProof = serde_json::from_value(json).unwrap();
        assert_eq!(back, proof);
    }
}
