//! # dirhash-merkle
//!
//! Binary Merkle tree engine for dirhash.
//!
//! - [`binary::BinaryMerkleTree`]: builds a tree from an ordered list of data
//!   blocks and generates membership proofs for block contents
//! - [`proof::MerkleProof`]: sibling digests plus sides, verified against a
//!   published root with [`verify_proof`] without access to the tree
//! - [`render::TreeDisplay`]: pre-order text rendering for inspection
//!
//! Every operation here is pure and synchronous. A tree is never mutated after
//! it is built; new input means a new tree.

pub mod binary;
pub mod error;
pub mod hash;
pub mod proof;
pub mod render;

pub use binary::{BinaryMerkleTree, MerkleNode, NodeIndex, NodeKind};
pub use error::{MerkleError, MerkleResult};
pub use hash::HashValue;
pub use proof::{verify_proof, MerkleProof, ProofStep, Side};
pub use render::TreeDisplay;

/// The length of hash digests used in the merkle tree (32 bytes = 256 bits)
pub const HASH_LENGTH: usize = 32;
