//! Install command - run a game's installer and remember the result.

use anyhow::{Result, bail};
use clap::Args;

use crate::depot::installer::{self, InstallOutcome};
use crate::model::config::AppConfig;
use crate::model::snapshot::Snapshot;

#[derive(Args)]
pub struct InstallArgs {
    /// Id of the game to install (see `depot list`)
    pub id: String,
}

pub fn execute(config: &AppConfig, args: InstallArgs) -> Result<()> {
    let snapshot_path = config.snapshot_path();
    let mut snapshot = Snapshot::load(&snapshot_path)?;

    let Some(entry) = snapshot.get(&args.id).cloned() else {
        bail!("unknown game id: {} (run `depot scan` first)", args.id);
    };

    match installer::run_installer(&entry)? {
        InstallOutcome::NoInstaller => {
            println!("{}: descriptor names no installer", entry.title);
        }
        InstallOutcome::Completed => {
            if let Some(entry) = snapshot.get_mut(&args.id) {
                entry.installed = true;
            }
            snapshot.save(&snapshot_path)?;
            println!("{}: installed", entry.title);
        }
        InstallOutcome::Failed(status) => {
            bail!("installer exited with {status}");
        }
    }

    Ok(())
}
