use std::path::PathBuf;

use dirhash_merkle::MerkleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Merkle tree error: {0}")]
    Merkle(#[from] MerkleError),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot of {} contains no files", .0.display())]
    EmptySnapshot(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
