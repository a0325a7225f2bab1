//! Adopt command - fold downloaded installers into per-game folders.

use anyhow::Result;
use clap::Args;

use crate::depot::organizer::Organizer;
use crate::model::config::AppConfig;

#[derive(Args)]
pub struct AdoptArgs {
    /// Rescan the depot after adopting so the snapshot picks the games up
    #[arg(long)]
    pub rescan: bool,
}

pub fn execute(config: &AppConfig, args: AdoptArgs) -> Result<()> {
    let organizer = Organizer::new(
        config.depot_root(),
        config.depot.metadata_file.clone(),
        config.template_path(),
        &config.adopt.download_prefix,
    )?;

    let adopted = organizer.adopt_all()?;

    if adopted.is_empty() {
        println!("depot: nothing to adopt");
        return Ok(());
    }

    for game in &adopted {
        println!("adopted {:<36} -> {}", game.title, game.folder.display());
    }
    println!("depot: {} downloads adopted", adopted.len());

    if args.rescan {
        return super::scan::execute(
            config,
            super::scan::ScanArgs {
                json: false,
                dry_run: false,
            },
        );
    }

    Ok(())
}
