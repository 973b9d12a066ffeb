use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "udict",
    about = "Keep weekday-aware date entries in an IME user dictionary current",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rewrite the configured dictionary's date entries
    Update(UpdateArgs),
    /// List the dictionaries stored in the database
    Show(ShowArgs),
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,
    /// Override the dictionary database path from the config
    #[arg(long)]
    pub db_path: Option<PathBuf>,
    /// Override today's date (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<NaiveDate>,
    /// Show the updates without writing the dictionary file
    #[arg(long)]
    pub dry_run: bool,
    /// Do not create a timestamped backup of the dictionary file
    #[arg(long)]
    pub no_backup: bool,
    /// Reload the IME after updating (default on macOS)
    #[arg(long, overrides_with = "no_reload")]
    pub reload: bool,
    /// Skip reloading the IME after updating
    #[arg(long, overrides_with = "reload")]
    pub no_reload: bool,
    /// Path to DictionaryTool.app or GoogleJapaneseInputTool.app
    #[arg(long)]
    pub tool_path: Option<PathBuf>,
}

impl UpdateArgs {
    pub fn reload_enabled(&self) -> bool {
        if self.reload {
            true
        } else if self.no_reload {
            false
        } else {
            cfg!(target_os = "macos")
        }
    }
}

#[derive(Args)]
pub struct ShowArgs {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,
    /// Read this database instead of the configured one
    #[arg(long)]
    pub db_path: Option<PathBuf>,
}
