use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::msg::Msg;

/// File watcher thread — emits FileChanged for create/modify/remove events
/// under the depot root.
pub fn spawn_depot_watcher(root: PathBuf, tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let tx_watch = tx.clone();
        let mut watcher: RecommendedWatcher =
            match notify::recommended_watcher(move |res: notify::Result<notify::Event>| match res {
                Ok(event) => {
                    if matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    ) {
                        for path in event.paths {
                            if tx_watch.send(Msg::FileChanged(path)).is_err() {
                                return;
                            }
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!("file watcher error: {err}");
                }
            }) {
                Ok(w) => w,
                Err(err) => {
                    tracing::warn!("failed to initialize file watcher: {err}");
                    return;
                }
            };

        if let Err(err) = watcher.watch(&root, RecursiveMode::Recursive) {
            tracing::warn!("failed to watch depot root {}: {err}", root.display());
            return;
        }

        loop {
            thread::park();
        }
    });
}

/// Tick thread — 50ms periodic tick for debounce checks.
pub fn spawn_tick_thread(tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        loop {
            thread::sleep(Duration::from_millis(50));
            if tx.send(Msg::Tick).is_err() {
                break;
            }
        }
    });
}

/// Tracks the quiet period after filesystem events so bursts of changes
/// (a download finishing, an adoption) collapse into one rescan.
pub struct DebounceGate {
    debounce: Duration,
    pending_since: Option<Instant>,
}

impl DebounceGate {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending_since: None,
        }
    }

    pub fn note_event(&mut self) {
        self.pending_since = Some(Instant::now());
    }

    /// True once the debounce window has passed since the last event.
    /// Arms back to idle when it fires.
    pub fn take_ready(&mut self) -> bool {
        match self.pending_since {
            Some(since) if since.elapsed() >= self.debounce => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}
