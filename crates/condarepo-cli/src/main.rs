//! condarepo - conda package cache to file repository converter

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use condarepo_cli::Cli;
use condarepo_cli::cmd;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cmd::rewrite::rewrite(cli).await
}
