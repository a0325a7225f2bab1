use std::path::PathBuf;

/// All possible messages that drive the watch loop.
#[derive(Debug)]
pub enum Msg {
    /// Something under the depot root changed.
    FileChanged(PathBuf),
    /// Periodic tick for debounce checks.
    Tick,
}
