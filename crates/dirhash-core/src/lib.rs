//! Shared runtime pieces for dirhash: directory snapshots feeding the Merkle
//! tree, the watch loop's root tracking, and environment configuration.

pub mod config;
pub mod error;
pub mod snapshot;
pub mod watch;

pub use config::DirhashConfig;
pub use error::{CoreError, CoreResult};
pub use snapshot::Snapshot;
pub use watch::{snapshot_root, RootChange, WatchState, Watcher};
