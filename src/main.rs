mod commands;
mod depot;
mod model;
mod msg;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};

use model::config::AppConfig;

/// depot - local game installer depot
#[derive(Parser)]
#[command(name = "depot")]
#[command(about = "Scan a local depot of game installers and report them to a launcher")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the depot and refresh the snapshot
    Scan(commands::scan::ScanArgs),

    /// Show the remembered depot state without rescanning
    List(commands::list::ListArgs),

    /// Watch the depot and report additions/removals as they happen
    Watch(commands::watch::WatchArgs),

    /// Fold downloaded installers into per-game folders
    Adopt(commands::adopt::AdoptArgs),

    /// Run a game's installer and mark it installed
    Install(commands::install::InstallArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to file (never stdout)
    let log_dir = directories::ProjectDirs::from("", "", "depot")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| std::path::PathBuf::from("/tmp"));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "depot.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter("depot=info")
        .init();

    tracing::info!("depot starting");

    let config = AppConfig::load()?;

    match cli.command {
        Commands::Scan(args) => commands::scan::execute(&config, args),
        Commands::List(args) => commands::list::execute(&config, args),
        Commands::Watch(args) => commands::watch::execute(&config, args),
        Commands::Adopt(args) => commands::adopt::execute(&config, args),
        Commands::Install(args) => commands::install::execute(&config, args),
    }
}
