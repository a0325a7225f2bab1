//! Scan command - one-shot depot scan, snapshot refresh, report.

use std::io;

use anyhow::Result;
use clap::Args;

use crate::depot::scanner;
use crate::model::config::AppConfig;
use crate::model::snapshot::Snapshot;
use crate::report::{JsonReporter, Reporter, TextReporter};

#[derive(Args)]
pub struct ScanArgs {
    /// Emit the records as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Scan without touching the snapshot file
    #[arg(long)]
    pub dry_run: bool,
}

pub fn execute(config: &AppConfig, args: ScanArgs) -> Result<()> {
    let root = config.depot_root();
    let outcome = scanner::scan(&root, &config.depot.metadata_file)?;

    for line in outcome.issue_lines() {
        eprintln!("{line}");
    }

    if !args.dry_run {
        let snapshot_path = config.snapshot_path();
        let mut snapshot = Snapshot::load(&snapshot_path)?;
        snapshot.merge(&outcome.games);
        snapshot.save(&snapshot_path)?;
    }

    if args.json {
        JsonReporter::new(io::stdout().lock()).report(&outcome.games)?;
    } else {
        TextReporter::new(io::stdout().lock()).report(&outcome.games)?;
        println!("{}", outcome.summary());
    }

    Ok(())
}
