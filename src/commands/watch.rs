//! Watch command - long-running depot monitor.
//!
//! Mirrors what a launcher tick does: rescan after the depot settles,
//! diff against the snapshot, report additions and removals.

use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::depot::scanner;
use crate::depot::watcher::{self, DebounceGate};
use crate::model::config::AppConfig;
use crate::model::snapshot::Snapshot;
use crate::msg::Msg;

#[derive(Args)]
pub struct WatchArgs {
    /// Override the configured rescan debounce, in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,
}

pub fn execute(config: &AppConfig, args: WatchArgs) -> Result<()> {
    let root = config.depot_root();
    let snapshot_path = config.snapshot_path();

    // Initial scan so the snapshot reflects reality before waiting.
    let outcome = scanner::scan(&root, &config.depot.metadata_file)?;
    let mut snapshot = Snapshot::load(&snapshot_path)?;
    let diff = snapshot.merge(&outcome.games);
    if !diff.is_empty() {
        snapshot.save(&snapshot_path)?;
    }
    println!("{}", outcome.summary());
    println!("watching {} (ctrl-c to stop)", root.display());
    tracing::info!("watching {}", root.display());

    let (tx, rx) = mpsc::channel::<Msg>();
    watcher::spawn_depot_watcher(root.clone(), tx.clone());
    watcher::spawn_tick_thread(tx);

    let debounce = args.debounce_ms.unwrap_or(config.watch.debounce_ms);
    let mut gate = DebounceGate::new(Duration::from_millis(debounce));

    // ── Main event loop ──
    loop {
        // Batch-drain all pending messages
        let first = rx.recv()?;
        note_msg(first, &snapshot_path, &mut gate);

        while let Ok(msg) = rx.try_recv() {
            note_msg(msg, &snapshot_path, &mut gate);
        }

        if gate.take_ready() {
            rescan(config, &root, &snapshot_path, &mut snapshot);
        }
    }
}

fn note_msg(msg: Msg, snapshot_path: &Path, gate: &mut DebounceGate) {
    match msg {
        // Writing the snapshot is our own change; rescanning on it would loop.
        Msg::FileChanged(path) if path == snapshot_path => {}
        Msg::FileChanged(_) => gate.note_event(),
        Msg::Tick => {}
    }
}

/// Rescan and report what changed. Scan failures are logged, never fatal
/// for the loop.
fn rescan(config: &AppConfig, root: &Path, snapshot_path: &Path, snapshot: &mut Snapshot) {
    let outcome = match scanner::scan(root, &config.depot.metadata_file) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!("rescan failed: {err:#}");
            return;
        }
    };

    let diff = snapshot.merge(&outcome.games);
    if diff.is_empty() {
        tracing::debug!("rescan: no changes");
        return;
    }

    for id in &diff.added {
        let title = snapshot.get(id).map(|e| e.title.as_str()).unwrap_or(id.as_str());
        println!("+ {title} ({id})");
        tracing::info!("game {id} appeared");
    }
    for id in &diff.removed {
        println!("- {id}");
        tracing::info!("game {id} disappeared");
    }

    if let Err(err) = snapshot.save(snapshot_path) {
        tracing::error!("saving snapshot: {err:#}");
    }
}
