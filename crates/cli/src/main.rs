use std::path::PathBuf;

use clap::Parser;
use commands::{Command, CommandClient, Commands, Context};
use config::{Config, ConfigArgs};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

mod commands;
mod config;

/// Command-line interface for Dual staking options.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the config file. Defaults to `dual.toml` if present.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,
    #[command(flatten)]
    overrides: ConfigArgs,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    async fn execute(&self) -> eyre::Result<()> {
        let config = Config::load(self.config.as_deref(), &self.overrides)?;
        tracing::debug!(cluster = %config.cluster(), "loaded config");
        let client = CommandClient::new(&config)?;
        self.command.execute(Context::new(&config, &client)).await
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    Cli::parse().execute().await
}
