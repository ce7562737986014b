use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use rstdoc::cli::Cli;
use rstdoc::core::Engine;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides the default level
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting rstdoc v{}", env!("CARGO_PKG_VERSION"));

    let engine = Engine::new(cli.config.as_deref(), cli.no_delay).await?;

    cli.execute(engine).await
}
