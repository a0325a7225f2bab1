use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Operating systems an installer can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsTag {
    Windows,
    Mac,
    Linux,
}

impl OsTag {
    /// Parse a tag from the descriptor wire format. Unknown tags map to `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "windows" => Some(OsTag::Windows),
            "mac" => Some(OsTag::Mac),
            "linux" => Some(OsTag::Linux),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OsTag::Windows => "windows",
            OsTag::Mac => "mac",
            OsTag::Linux => "linux",
        }
    }
}

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("{path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The on-disk per-game descriptor (`game.json`).
///
/// Only `title` is required; everything else degrades to an empty or
/// generated value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installer_file: Option<String>,
    #[serde(default)]
    pub image_files: Vec<String>,
    #[serde(default)]
    pub compatible_os: Vec<String>,
}

impl GameMetadata {
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let raw = fs::read_to_string(path).map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| MetadataError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), MetadataError> {
        let raw = serde_json::to_string_pretty(self).map_err(|source| MetadataError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        fs::write(path, raw).map_err(|source| MetadataError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// One game in the depot, ready to hand to a launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub id: String,
    pub title: String,
    pub location: PathBuf,
    pub installer_file: Option<String>,
    pub image_files: Vec<String>,
    pub compatible_os: BTreeSet<OsTag>,
}

impl GameRecord {
    /// Build a record from a descriptor found in `location`.
    ///
    /// A descriptor without a `uuid` gets an identifier derived from the
    /// folder name, so repeated scans agree on it. Unknown OS tags are
    /// dropped, matching what launchers tolerate on their side.
    pub fn from_metadata(location: &Path, metadata: GameMetadata) -> Self {
        let id = metadata
            .uuid
            .clone()
            .unwrap_or_else(|| folder_id(location));

        let compatible_os = metadata
            .compatible_os
            .iter()
            .filter_map(|tag| OsTag::parse(tag))
            .collect();

        Self {
            id,
            title: metadata.title,
            location: location.to_path_buf(),
            installer_file: metadata.installer_file,
            image_files: metadata.image_files,
            compatible_os,
        }
    }

    /// Absolute path of the installer, when the descriptor names one.
    pub fn installer_path(&self) -> Option<PathBuf> {
        self.installer_file
            .as_ref()
            .map(|file| self.location.join(file))
    }
}

/// Stable identifier for a game folder without an explicit `uuid`.
fn folder_id(location: &Path) -> String {
    let name = location
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        slug.push_str("untitled");
    }

    slug
}
