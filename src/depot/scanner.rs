use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use ignore::WalkBuilder;

use crate::model::game::{GameMetadata, GameRecord, MetadataError};

/// A subfolder whose descriptor could not be read or parsed.
///
/// Issues never abort a scan; they ride along in the outcome so callers
/// can log or display them.
#[derive(Debug)]
pub struct ScanIssue {
    pub location: PathBuf,
    pub error: MetadataError,
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub games: Vec<GameRecord>,
    pub issues: Vec<ScanIssue>,
}

impl ScanOutcome {
    pub fn summary(&self) -> String {
        format!(
            "depot: {} games, {} issues",
            self.games.len(),
            self.issues.len()
        )
    }

    pub fn issue_lines(&self) -> Vec<String> {
        self.issues
            .iter()
            .map(|issue| format!("skipped {}: {}", issue.location.display(), issue.error))
            .collect()
    }
}

/// Scan the depot root for games.
///
/// Each immediate subdirectory carrying a `metadata_file` descriptor yields
/// one record. Subdirectories without one are skipped silently, malformed
/// descriptors become issues, and an unusable root is the only fatal case.
pub fn scan(root: &Path, metadata_file: &str) -> Result<ScanOutcome> {
    let root_meta = fs::metadata(root)
        .with_context(|| format!("cannot access depot root {}", root.display()))?;
    if !root_meta.is_dir() {
        bail!("depot root {} is not a directory", root.display());
    }

    let mut outcome = ScanOutcome::default();

    let subdirs = WalkBuilder::new(root)
        .max_depth(Some(1))
        .hidden(false)
        .build()
        .flatten()
        .filter_map(|entry| {
            let path = entry.path().to_path_buf();
            if path == root {
                return None;
            }

            let metadata = entry.metadata().ok()?;
            metadata.is_dir().then_some(path)
        });

    for dir in subdirs {
        let descriptor = dir.join(metadata_file);
        if !descriptor.exists() {
            continue;
        }

        match GameMetadata::load(&descriptor) {
            Ok(metadata) => {
                let record = GameRecord::from_metadata(&dir, metadata);
                tracing::debug!("found {} ({})", record.title, record.id);
                outcome.games.push(record);
            }
            Err(error) => {
                tracing::warn!("skipping {}: {error}", dir.display());
                outcome.issues.push(ScanIssue {
                    location: dir,
                    error,
                });
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn write_game(root: &Path, folder: &str, descriptor: &str) {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("game.json"), descriptor).unwrap();
    }

    #[test]
    fn only_folders_with_descriptors_yield_records() {
        let depot = TempDir::new().unwrap();
        write_game(depot.path(), "Alpha", r#"{ "title": "Alpha" }"#);
        write_game(depot.path(), "Beta", r#"{ "title": "Beta" }"#);
        fs::create_dir_all(depot.path().join("Empty One")).unwrap();
        fs::create_dir_all(depot.path().join("Empty Two")).unwrap();

        let outcome = scan(depot.path(), "game.json").unwrap();

        let titles: BTreeSet<String> =
            outcome.games.iter().map(|g| g.title.clone()).collect();
        assert_eq!(
            titles,
            BTreeSet::from(["Alpha".to_string(), "Beta".to_string()])
        );
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn malformed_descriptor_does_not_abort_siblings() {
        let depot = TempDir::new().unwrap();
        write_game(depot.path(), "Good", r#"{ "title": "Good" }"#);
        write_game(depot.path(), "Broken", "{ not json");

        let outcome = scan(depot.path(), "game.json").unwrap();

        assert_eq!(outcome.games.len(), 1);
        assert_eq!(outcome.games[0].title, "Good");
        assert_eq!(outcome.issues.len(), 1);
        assert!(outcome.issues[0].location.ends_with("Broken"));
    }

    #[test]
    fn files_in_the_root_are_ignored() {
        let depot = TempDir::new().unwrap();
        write_game(depot.path(), "Alpha", r#"{ "title": "Alpha" }"#);
        fs::write(depot.path().join("stray.txt"), "not a game").unwrap();
        fs::write(depot.path().join("game.json"), r#"{ "title": "Rootish" }"#).unwrap();

        let outcome = scan(depot.path(), "game.json").unwrap();
        assert_eq!(outcome.games.len(), 1);
        assert_eq!(outcome.games[0].title, "Alpha");
    }

    #[test]
    fn missing_root_is_fatal() {
        let depot = TempDir::new().unwrap();
        let gone = depot.path().join("nope");
        assert!(scan(&gone, "game.json").is_err());
    }

    #[test]
    fn descriptor_fields_flow_into_the_record() {
        let depot = TempDir::new().unwrap();
        write_game(
            depot.path(),
            "Alpha Centauri",
            r#"{
                "title": "Sid Meier's Alpha Centauri",
                "installer_file": "setup_smac.exe",
                "compatible_os": ["windows", "mac"]
            }"#,
        );

        let outcome = scan(depot.path(), "game.json").unwrap();
        let game = &outcome.games[0];
        assert_eq!(game.id, "alpha-centauri");
        assert_eq!(game.title, "Sid Meier's Alpha Centauri");
        assert_eq!(
            game.installer_path(),
            Some(depot.path().join("Alpha Centauri").join("setup_smac.exe"))
        );
    }
}
