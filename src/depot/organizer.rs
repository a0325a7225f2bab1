use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::game::GameMetadata;

/// A download that was moved into its own game folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdoptedGame {
    pub title: String,
    pub folder: PathBuf,
    pub installer: String,
}

/// Moves freshly downloaded installers into per-game folders.
///
/// Browsers drop installers into the depot root named
/// `"<prefix><Game Name>.<ext>"`. Adoption creates the `<Game Name>`
/// subfolder, moves the installer inside, and stamps a descriptor built
/// from the root's template so the next scan picks the game up.
pub struct Organizer {
    root: PathBuf,
    metadata_file: String,
    template_path: PathBuf,
    download_pattern: Regex,
}

impl Organizer {
    pub fn new(
        root: PathBuf,
        metadata_file: String,
        template_path: PathBuf,
        download_prefix: &str,
    ) -> Result<Self> {
        let download_pattern = Regex::new(&format!("^{}(.+)$", regex::escape(download_prefix)))
            .context("building download filename pattern")?;

        Ok(Self {
            root,
            metadata_file,
            template_path,
            download_pattern,
        })
    }

    pub fn adopt_all(&self) -> Result<Vec<AdoptedGame>> {
        let template = GameMetadata::load(&self.template_path).with_context(|| {
            format!("reading adopt template {}", self.template_path.display())
        })?;

        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("cannot access depot root {}", self.root.display()))?;

        let mut adopted = Vec::new();

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let Some(title) = self.download_title(&path) else {
                continue;
            };

            adopted.push(self.adopt_one(&path, &title, &template)?);
        }

        Ok(adopted)
    }

    /// Game title encoded in a download filename, if it matches the pattern.
    fn download_title(&self, path: &Path) -> Option<String> {
        let stem = path.file_stem()?.to_str()?;
        let captures = self.download_pattern.captures(stem)?;
        let title = captures.get(1)?.as_str().trim();
        (!title.is_empty()).then(|| title.to_string())
    }

    fn adopt_one(
        &self,
        installer: &Path,
        title: &str,
        template: &GameMetadata,
    ) -> Result<AdoptedGame> {
        let file_name = installer
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .with_context(|| format!("unreadable installer name {}", installer.display()))?;

        let folder = self.root.join(title);
        fs::create_dir_all(&folder)
            .with_context(|| format!("creating game folder {}", folder.display()))?;

        let target = folder.join(&file_name);
        fs::rename(installer, &target)
            .with_context(|| format!("moving installer into {}", folder.display()))?;

        let mut metadata = template.clone();
        metadata.uuid = None;
        metadata.title = title.to_string();
        metadata.installer_file = Some(file_name.clone());
        metadata.save(&folder.join(&self.metadata_file))?;

        tracing::info!("adopted {title} ({file_name})");

        Ok(AdoptedGame {
            title: title.to_string(),
            folder,
            installer: file_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn organizer(root: &Path) -> Organizer {
        Organizer::new(
            root.to_path_buf(),
            "game.json".to_string(),
            root.join("game_template.json"),
            "Download ",
        )
        .unwrap()
    }

    fn write_template(root: &Path) {
        fs::write(
            root.join("game_template.json"),
            r#"{ "title": "placeholder", "compatible_os": ["windows"] }"#,
        )
        .unwrap();
    }

    #[test]
    fn download_is_moved_and_described() {
        let depot = TempDir::new().unwrap();
        write_template(depot.path());
        fs::write(depot.path().join("Download Cave Story.exe"), b"installer").unwrap();

        let adopted = organizer(depot.path()).adopt_all().unwrap();

        assert_eq!(adopted.len(), 1);
        assert_eq!(adopted[0].title, "Cave Story");
        assert_eq!(adopted[0].installer, "Download Cave Story.exe");

        let folder = depot.path().join("Cave Story");
        assert!(folder.join("Download Cave Story.exe").is_file());
        assert!(!depot.path().join("Download Cave Story.exe").exists());

        let metadata = GameMetadata::load(&folder.join("game.json")).unwrap();
        assert_eq!(metadata.title, "Cave Story");
        assert_eq!(
            metadata.installer_file.as_deref(),
            Some("Download Cave Story.exe")
        );
        assert_eq!(metadata.compatible_os, vec!["windows".to_string()]);
        assert!(metadata.uuid.is_none());
    }

    #[test]
    fn non_matching_files_are_left_alone() {
        let depot = TempDir::new().unwrap();
        write_template(depot.path());
        fs::write(depot.path().join("readme.txt"), b"hello").unwrap();

        let adopted = organizer(depot.path()).adopt_all().unwrap();

        assert!(adopted.is_empty());
        assert!(depot.path().join("readme.txt").is_file());
    }

    #[test]
    fn missing_template_is_fatal() {
        let depot = TempDir::new().unwrap();
        fs::write(depot.path().join("Download Anodyne.exe"), b"installer").unwrap();

        assert!(organizer(depot.path()).adopt_all().is_err());
    }
}
