//! Watch command handler

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use dirhash_core::{snapshot_root, DirhashConfig, RootChange, Watcher};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

pub async fn handle(folder: PathBuf, config: &DirhashConfig) -> Result<()> {
    println!(
        "{} Watching folder: {}",
        "→".cyan().bold(),
        folder.display().to_string().cyan()
    );
    info!(
        folder = %folder.display(),
        interval = ?config.poll_interval,
        "Watch loop started"
    );

    watch_until(Watcher::new(folder), config.poll_interval, tokio::signal::ctrl_c()).await?;
    println!("{} Stopped watching", "→".dimmed());
    Ok(())
}

/// Poll the watcher every `period` until `shutdown` resolves.
///
/// `shutdown` is created once and stays registered for the whole loop, so a
/// signal that arrives during a snapshot is still seen.
async fn watch_until<F>(mut watcher: Watcher, period: Duration, shutdown: F) -> Result<Watcher>
where
    F: Future<Output = io::Result<()>>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            stop = &mut shutdown => {
                stop.context("Failed to listen for Ctrl-C")?;
                break;
            }
        }

        let target = watcher.folder().to_path_buf();
        let snapshot = tokio::task::spawn_blocking(move || snapshot_root(&target));
        let outcome = tokio::select! {
            joined = snapshot => joined?,
            stop = &mut shutdown => {
                stop.context("Failed to listen for Ctrl-C")?;
                break;
            }
        };

        match outcome {
            Ok(root) => report(&watcher.observe(root)),
            // Transient: keep the last root and try again next tick
            Err(e) => warn!(error = %e, "Snapshot failed, retrying next interval"),
        }
    }

    Ok(watcher)
}

fn report(change: &RootChange) {
    match change {
        RootChange::Initialized(_) => println!("{} {}", "✓".green().bold(), change),
        RootChange::Changed { previous, .. } => {
            debug!(previous = %previous, "Root replaced");
            println!("{} {}", "!".yellow().bold(), change);
        }
        RootChange::Unchanged(root) => debug!(root = %root, "Root unchanged"),
    }
}
