pub mod scenario;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "subway-sections")]
#[command(about = "Replay edits on a subway line and print its stations in order")]
pub struct CliConfig {
    /// Path to the TOML line scenario
    #[arg(short, long, default_value = "line.toml")]
    pub config: String,

    /// Override the output format from the scenario (text, json, csv)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Validate the scenario and print a summary without replaying it
    #[arg(long)]
    pub dry_run: bool,
}
