//! Pose Sync - Command Line Entry Point

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use sync_service::{init_logging, run_replay, ReplayFile, Settings};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pose-sync", version, about = "Pose synchronization engine")]
struct Cli {
    /// Settings file (TOML); `POSE_SYNC__*` variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recorded session and print its performance report
    Replay { file: PathBuf },
    /// Print the effective settings
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    init_logging(&settings.log_level, settings.log_json).context("initializing logging")?;

    info!("=== Pose Sync v{} ===", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Replay { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let replay: ReplayFile = serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", file.display()))?;

            let report = run_replay(replay, &settings).await?;
            info!(
                mistakes = report.mistakes,
                rating = %report.rating,
                "Session complete"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Settings => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}
