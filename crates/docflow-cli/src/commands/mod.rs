//! CLI command definitions and dispatch.

pub mod cleanup_expired;
pub mod fix_paths;
pub mod migrate;
pub mod setup_storage;
pub mod stats;

use anyhow::Result;
use clap::{Parser, Subcommand};

use docflow_core::config::AppConfig;

/// Docflow administrative CLI.
#[derive(Debug, Parser)]
#[command(name = "docflow", version, about = "Document-control administration")]
pub struct Cli {
    /// Configuration environment overlay to load (config/<env>.toml).
    #[arg(long, global = true, default_value = "development")]
    pub env: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run pending database migrations.
    Migrate,
    /// Create the canonical storage folder tree.
    SetupStorage,
    /// Archive published documents past their expiry date.
    CleanupExpired,
    /// Move document files back under their canonical status folders.
    FixPaths,
    /// Print document counts by status.
    Stats,
}

impl Cli {
    /// Execute the selected command.
    pub async fn execute(&self) -> Result<()> {
        let config = AppConfig::load(&self.env)?;

        match &self.command {
            Commands::Migrate => migrate::run(&config).await,
            Commands::SetupStorage => setup_storage::run(&config).await,
            Commands::CleanupExpired => cleanup_expired::run(&config).await,
            Commands::FixPaths => fix_paths::run(&config).await,
            Commands::Stats => stats::run(&config).await,
        }
    }
}
