//! dirhash - Merkle roots and membership proofs for directory contents
//!
//! Commands:
//! - `watch`: report the folder's Merkle root whenever it changes
//! - `proof`: prove a file content is part of the folder and check it against a root
//! - `visualize`: print the folder's Merkle tree
//! - `root`: print the folder's current Merkle root once

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dirhash_core::DirhashConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dirhash")]
#[command(author, version, about = "Merkle roots and membership proofs for directory contents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll a folder and report its Merkle root on every change
    Watch {
        /// Folder to watch
        folder: PathBuf,

        /// Polling interval in milliseconds (overrides DIRHASH_POLL_INTERVAL_MS)
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Generate a proof for a value and verify it against an expected root
    Proof {
        /// Folder whose files form the tree leaves
        folder: PathBuf,

        /// Exact file content to prove
        value: String,

        /// Expected Merkle root as hex
        expected_root: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the Merkle tree of a folder
    Visualize {
        /// Folder to render
        folder: PathBuf,
    },

    /// Print the current Merkle root of a folder
    Root {
        /// Folder to hash
        folder: PathBuf,
    },
}

fn init_tracing(config: &DirhashConfig) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = DirhashConfig::from_env();
    if let Commands::Watch { interval_ms, .. } = &cli.command {
        config = config.with_poll_interval_ms(*interval_ms);
    }

    init_tracing(&config);
    config.validate()?;

    if !config.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Watch { folder, .. } => commands::watch::handle(folder, &config).await,
        Commands::Proof {
            folder,
            value,
            expected_root,
            json,
        } => commands::proof::handle(&folder, &value, &expected_root, json),
        Commands::Visualize { folder } => commands::visualize::handle(&folder),
        Commands::Root { folder } => commands::root::handle(&folder),
    }
}
