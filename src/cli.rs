use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

use crate::core::Engine;

#[derive(Parser)]
#[command(name = "rstdoc")]
#[command(about = "Incremental reStructuredText documentation for mudlib sources")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip the cooperative delay between ticks
    #[arg(long)]
    pub no_delay: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Target directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Regenerate documents for files changed since the last sweep
    Scan,

    /// Clear the output tree and regenerate everything
    Rebuild,

    /// Sweep periodically until interrupted
    Watch,

    /// Show how source paths are classified
    Classify {
        /// Logical paths (`/cmds/look.c`) or paths under the source root
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Show the persisted scan state
    Status,
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Init { path } => engine.init(path).await,
            Commands::Scan => engine.scan(false).await.map(|_| ()),
            Commands::Rebuild => engine.scan(true).await.map(|_| ()),
            Commands::Watch => engine.watch().await,
            Commands::Classify { paths } => engine.classify(&paths),
            Commands::Status => engine.status(),
        }
    }
}
