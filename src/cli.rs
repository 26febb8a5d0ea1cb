use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Terminal gardening assistant: tasks, calendar, weather and tips.
/// Data lives in $GARDEN_HOME, ~/.garden, or the directory passed via --data-dir.
#[derive(Parser)]
#[command(name = "garden", version, about = "Gardening assistant with a task calendar")]
pub struct Cli {
    /// Directory holding storage.json and config.json.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
