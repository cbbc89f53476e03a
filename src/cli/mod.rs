use crate::config::AppConfig;
use crate::errors::AppResult;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Bitcoin Transaction Provider Consistency Checker
#[derive(Parser)]
#[command(name = "chain-consistency")]
#[command(about = "Cross-validate Bitcoin transaction providers against known-good fixtures")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check every fixture against every selected provider
    Check(commands::check::CheckCommand),
    /// Fetch one transaction from a single provider and print it
    Fetch(commands::fetch::FetchCommand),
    /// Test Bitcoin RPC connectivity
    TestRpc(commands::test_rpc::TestRpcCommand),
    /// Validate and list the fixture set
    Fixtures(commands::fixtures::FixturesCommand),
}

pub async fn run() -> AppResult<()> {
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    let config = AppConfig::load_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Check(command) => command.run(config).await,
        Commands::Fetch(command) => command.run(config).await,
        Commands::TestRpc(command) => command.run(config).await,
        Commands::Fixtures(command) => command.run(config),
    }
}
