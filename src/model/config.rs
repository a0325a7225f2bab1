use anyhow::{Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub depot: DepotConfig,
    pub adopt: AdoptConfig,
    pub watch: WatchConfig,
}

#[derive(Debug, Deserialize)]
pub struct DepotConfig {
    pub root: String,
    pub metadata_file: String,
    pub snapshot_file: String,
}

#[derive(Debug, Deserialize)]
pub struct AdoptConfig {
    pub template_file: String,
    pub download_prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct WatchConfig {
    pub debounce_ms: u64,
}

impl AppConfig {
    /// Load configuration with layering: defaults → user config.
    pub fn load() -> Result<Self> {
        let defaults = include_str!("../../config/default.toml");
        let mut config: AppConfig = toml::from_str(defaults)?;

        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "depot") {
            let config_path = proj_dirs.config_dir().join("config.toml");
            if config_path.exists() {
                let user_str = fs::read_to_string(&config_path)?;
                let user_config: AppConfig = toml::from_str(&user_str)?;
                config = user_config; // TODO: deep merge instead of full replace
            }
        }

        // Expand ~ in the depot root
        if config.depot.root.starts_with('~') {
            let home = dirs_home().ok_or_else(|| anyhow!("cannot determine home directory"))?;
            config.depot.root = config.depot.root.replacen('~', &home.to_string_lossy(), 1);
        }

        Ok(config)
    }

    pub fn depot_root(&self) -> PathBuf {
        PathBuf::from(&self.depot.root)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.depot_root().join(&self.depot.snapshot_file)
    }

    pub fn template_path(&self) -> PathBuf {
        self.depot_root().join(&self.adopt.template_file)
    }
}

fn dirs_home() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}
