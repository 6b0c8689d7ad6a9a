//! Directory snapshots.
//!
//! A snapshot maps every regular file under a directory (recursively) to its
//! contents, keyed by the raw bytes of the path relative to that directory with
//! `/` separators. Keys are kept sorted, which fixes the block order fed to the
//! tree builder. Names that are not valid UTF-8 keep their own key.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use dirhash_merkle::BinaryMerkleTree;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{CoreError, CoreResult};

/// An in-memory copy of a directory's files, ordered by relative path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    root: PathBuf,
    files: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl Snapshot {
    /// Read every file below `dir`.
    ///
    /// Entries the walker cannot access are skipped with a warning. A file
    /// that is listed but cannot be read fails the whole snapshot.
    pub fn read(dir: impl AsRef<Path>) -> CoreResult<Self> {
        let root = dir.as_ref();
        if !root.is_dir() {
            return Err(CoreError::NotADirectory(root.to_path_buf()));
        }

        let mut files = BTreeMap::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            let path = entry.path();
            // Symlinks count when they resolve to a regular file
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && path.is_file());
            if !is_file {
                continue;
            }

            let content = fs::read(path).map_err(|source| CoreError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            files.insert(relative_key(root, path), content);
        }

        debug!(root = %root.display(), files = files.len(), "Snapshot read");
        Ok(Self {
            root: root.to_path_buf(),
            files,
        })
    }

    /// Build a snapshot from already-loaded files.
    pub fn from_files<I, K>(root: impl Into<PathBuf>, files: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<u8>)>,
        K: Into<String>,
    {
        Self {
            root: root.into(),
            files: files
                .into_iter()
                .map(|(k, v)| (k.into().into_bytes(), v))
                .collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, relative_path: &str) -> Option<&[u8]> {
        self.files.get(relative_path.as_bytes()).map(Vec::as_slice)
    }

    /// Relative paths in block order, shown lossily when not UTF-8.
    pub fn paths(&self) -> impl Iterator<Item = Cow<'_, str>> {
        self.files.keys().map(|key| String::from_utf8_lossy(key))
    }

    /// File contents in block order.
    pub fn blocks(&self) -> impl Iterator<Item = &[u8]> {
        self.files.values().map(Vec::as_slice)
    }

    pub fn into_blocks(self) -> Vec<Vec<u8>> {
        self.files.into_values().collect()
    }

    /// Build the Merkle tree over this snapshot's blocks.
    ///
    /// An empty snapshot is rejected before the builder is reached.
    pub fn build_tree(self) -> CoreResult<BinaryMerkleTree> {
        if self.is_empty() {
            return Err(CoreError::EmptySnapshot(self.root));
        }
        Ok(BinaryMerkleTree::from_blocks(self.into_blocks())?)
    }
}

fn relative_key(root: &Path, path: &Path) -> Vec<u8> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().as_encoded_bytes())
        .collect::<Vec<_>>()
        .join(&b'/')
}
