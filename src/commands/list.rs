//! List command - show the remembered depot state without rescanning.

use std::io;

use anyhow::Result;
use clap::Args;

use crate::model::config::AppConfig;
use crate::model::snapshot::Snapshot;
use crate::report::{JsonReporter, Reporter, TextReporter};

#[derive(Args)]
pub struct ListArgs {
    /// Emit the records as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Show installation state alongside each game
    #[arg(long)]
    pub state: bool,
}

pub fn execute(config: &AppConfig, args: ListArgs) -> Result<()> {
    let snapshot = Snapshot::load(&config.snapshot_path())?;

    if snapshot.is_empty() {
        println!("depot: no games remembered yet, run `depot scan` first");
        return Ok(());
    }

    if args.json {
        JsonReporter::new(io::stdout().lock()).report(&snapshot.to_records())?;
        return Ok(());
    }

    if args.state {
        for (id, entry) in snapshot.iter() {
            println!("{:<28} {:<36} {}", id, entry.title, entry.local_state());
        }
    } else {
        TextReporter::new(io::stdout().lock()).report(&snapshot.to_records())?;
    }

    println!("depot: {} games remembered", snapshot.len());
    Ok(())
}
