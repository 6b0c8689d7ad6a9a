//! Error types for merkle tree operations.

use thiserror::Error;

/// Errors raised by tree construction and digest parsing.
///
/// A proof target that matches no leaf is not an error; proof generation
/// reports it as `None`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MerkleError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed hex digest: {0}")]
    MalformedHex(String),

    #[error("Invalid hash length: expected {expected} bytes, got {got}")]
    InvalidHashLength { expected: usize, got: usize },
}

impl MerkleError {
    /// Whether the error came from caller-supplied digest text.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            MerkleError::MalformedHex(_) | MerkleError::InvalidHashLength { .. }
        )
    }
}

pub type MerkleResult<T> = std::result::Result<T, MerkleError>;
