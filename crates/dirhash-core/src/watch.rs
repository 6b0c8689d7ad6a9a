//! Root-change tracking for the polling watcher.
//!
//! The watcher owns its state explicitly: the last root it observed, if any.
//! Each poll rebuilds the tree from a fresh snapshot and compares roots; no
//! tree survives between polls.

use std::fmt;
use std::path::{Path, PathBuf};

use dirhash_merkle::HashValue;
use tracing::debug;

use crate::error::CoreResult;
use crate::snapshot::Snapshot;

/// Outcome of observing a freshly computed root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RootChange {
    /// First root seen by this watcher
    Initialized(HashValue),
    /// Root differs from the previously observed one
    Changed {
        previous: HashValue,
        current: HashValue,
    },
    /// Root is the same as last time
    Unchanged(HashValue),
}

impl RootChange {
    /// The root digest that was just observed.
    pub fn root(&self) -> HashValue {
        match self {
            RootChange::Initialized(root) | RootChange::Unchanged(root) => *root,
            RootChange::Changed { current, .. } => *current,
        }
    }

    /// Whether this observation should be reported.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, RootChange::Unchanged(_))
    }
}

impl fmt::Display for RootChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootChange::Initialized(root) => write!(f, "Merkle root initialized: {}", root),
            RootChange::Changed { current, .. } => write!(f, "Merkle root changed: {}", current),
            RootChange::Unchanged(root) => write!(f, "Merkle root unchanged: {}", root),
        }
    }
}

/// Last root observed by a watch loop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WatchState {
    last_root: Option<HashValue>,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_root(&self) -> Option<HashValue> {
        self.last_root
    }

    pub fn is_initialized(&self) -> bool {
        self.last_root.is_some()
    }

    /// Record `root` and classify it against the previous observation.
    pub fn observe(&mut self, root: HashValue) -> RootChange {
        let change = match self.last_root {
            None => RootChange::Initialized(root),
            Some(previous) if previous != root => RootChange::Changed {
                previous,
                current: root,
            },
            Some(_) => RootChange::Unchanged(root),
        };
        self.last_root = Some(root);
        change
    }
}

/// Read `folder` and compute its current root digest.
pub fn snapshot_root(folder: &Path) -> CoreResult<HashValue> {
    let tree = Snapshot::read(folder)?.build_tree()?;
    debug!(leaves = tree.leaf_count(), root = %tree.root(), "Tree rebuilt");
    Ok(tree.root())
}

/// A folder paired with the state of its watch loop.
#[derive(Clone, Debug)]
pub struct Watcher {
    folder: PathBuf,
    state: WatchState,
}

impl Watcher {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
            state: WatchState::new(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// Rebuild the tree and observe its root.
    ///
    /// A failed read leaves the state untouched so the next poll compares
    /// against the last good root.
    pub fn poll(&mut self) -> CoreResult<RootChange> {
        let root = snapshot_root(&self.folder)?;
        Ok(self.state.observe(root))
    }

    /// Observe a root computed elsewhere (e.g. on a blocking worker).
    pub fn observe(&mut self, root: HashValue) -> RootChange {
        self.state.observe(root)
    }
}
