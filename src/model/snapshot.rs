use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::game::{GameRecord, OsTag};

/// Installation status of a depot entry, as launchers model it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalState {
    None,
    Installed,
    Running,
    InstalledRunning,
}

impl fmt::Display for LocalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LocalState::None => "not installed",
            LocalState::Installed => "installed",
            LocalState::Running => "running",
            LocalState::InstalledRunning => "installed, running",
        };
        f.write_str(label)
    }
}

/// One remembered game, keyed by id in the snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub title: String,
    pub location: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_file: Option<String>,
    #[serde(default)]
    pub image_files: Vec<String>,
    #[serde(default)]
    pub compatible_os: BTreeSet<OsTag>,
    #[serde(default)]
    pub installed: bool,
    #[serde(default)]
    pub running: bool,
}

impl SnapshotEntry {
    pub fn local_state(&self) -> LocalState {
        match (self.installed, self.running) {
            (false, false) => LocalState::None,
            (true, false) => LocalState::Installed,
            (false, true) => LocalState::Running,
            (true, true) => LocalState::InstalledRunning,
        }
    }

    pub fn installer_path(&self) -> Option<PathBuf> {
        self.installer_file
            .as_ref()
            .map(|file| self.location.join(file))
    }
}

/// Ids that appeared or disappeared between two scans.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DepotDiff {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl DepotDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// The depot state remembered between runs, stored as pretty JSON in the
/// depot root. Installed/running flags survive rescans this way.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<String, SnapshotEntry>,
}

impl Snapshot {
    /// Read the snapshot file. A missing or empty file is an empty snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading snapshot {}", path.display()));
            }
        };

        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str(&raw).with_context(|| format!("parsing snapshot {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("writing snapshot {}", path.display()))
    }

    pub fn get(&self, id: &str) -> Option<&SnapshotEntry> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut SnapshotEntry> {
        self.entries.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SnapshotEntry)> {
        self.entries.iter()
    }

    /// Replace the remembered games with a fresh scan, keeping the
    /// installed/running flags of ids that survived.
    ///
    /// Returns which ids appeared and which disappeared.
    pub fn merge(&mut self, games: &[GameRecord]) -> DepotDiff {
        let before: BTreeSet<String> = self.entries.keys().cloned().collect();

        let mut next = BTreeMap::new();
        for game in games {
            let (installed, running) = self
                .entries
                .get(&game.id)
                .map(|entry| (entry.installed, entry.running))
                .unwrap_or((false, false));

            next.insert(
                game.id.clone(),
                SnapshotEntry {
                    title: game.title.clone(),
                    location: game.location.clone(),
                    installer_file: game.installer_file.clone(),
                    image_files: game.image_files.clone(),
                    compatible_os: game.compatible_os.clone(),
                    installed,
                    running,
                },
            );
        }

        let after: BTreeSet<String> = next.keys().cloned().collect();
        self.entries = next;

        DepotDiff {
            added: after.difference(&before).cloned().collect(),
            removed: before.difference(&after).cloned().collect(),
        }
    }

    /// Rebuild records for reporting, in id order.
    pub fn to_records(&self) -> Vec<GameRecord> {
        self.entries
            .iter()
            .map(|(id, entry)| GameRecord {
                id: id.clone(),
                title: entry.title.clone(),
                location: entry.location.clone(),
                installer_file: entry.installer_file.clone(),
                image_files: entry.image_files.clone(),
                compatible_os: entry.compatible_os.clone(),
            })
            .collect()
    }
}
