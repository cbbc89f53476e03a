use super::{load_fixtures, RpcArgs};
use crate::comparator::{CheckerOptions, ComparisonPolicy, ConsistencyChecker};
use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::provider::{build_provider, ProviderKind, TransactionProvider};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Check every fixture against every selected provider
#[derive(Args)]
pub struct CheckCommand {
    /// Provider to check (repeat for several)
    #[arg(
        long = "provider",
        value_enum,
        default_values_t = vec![ProviderKind::Bitcoind, ProviderKind::BlockchainInfo]
    )]
    pub providers: Vec<ProviderKind>,

    /// Glob of fixture JSON files (default: built-in mainnet fixtures)
    #[arg(long)]
    pub fixtures: Option<String>,

    /// Recorded snapshot file for the snapshot provider
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Pairs checked concurrently (overrides config.toml)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-fetch timeout in seconds (overrides config.toml)
    #[arg(long)]
    pub fetch_timeout: Option<u64>,

    /// Also compare block height
    #[arg(long)]
    pub check_block_height: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub rpc: RpcArgs,
}

impl CheckCommand {
    pub async fn run(&self, mut config: AppConfig) -> AppResult<()> {
        self.rpc.apply(&mut config.bitcoin_rpc);
        let options = self.checker_options(&config)?;

        let fixtures = load_fixtures(self.fixtures.as_deref(), &config)?;
        let providers = self
            .providers
            .iter()
            .map(|kind| build_provider(*kind, &config, self.snapshot.as_deref()))
            .collect::<AppResult<Vec<Arc<dyn TransactionProvider>>>>()?;

        info!(
            "=== Consistency check: {} ===",
            self.providers
                .iter()
                .map(ProviderKind::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let checker = ConsistencyChecker::new(options);
        let abort = checker.abort_handle();
        let signal_task = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, finishing in-flight fetches");
                abort.abort();
            }
        });

        let report = checker.run(&fixtures, &providers).await;
        signal_task.abort();

        if self.json {
            println!("{}", report.to_json()?);
        } else {
            print!("{}", report.render_text());
        }

        let total = fixtures.len() * providers.len();
        if report.aborted {
            return Err(AppError::Aborted {
                completed: report.total_pairs(),
                total,
            });
        }
        if !report.is_success() {
            return Err(AppError::ConsistencyFailure {
                failed: report.failure_count(),
                total,
            });
        }
        Ok(())
    }

    fn checker_options(&self, config: &AppConfig) -> AppResult<CheckerOptions> {
        let concurrency = self.concurrency.unwrap_or(config.check.concurrency);
        if concurrency == 0 {
            return Err(AppError::Config(
                "--concurrency must be at least 1".to_string(),
            ));
        }
        let fetch_timeout = self
            .fetch_timeout
            .unwrap_or(config.check.fetch_timeout_seconds);
        if fetch_timeout == 0 {
            return Err(AppError::Config(
                "--fetch-timeout must be greater than 0".to_string(),
            ));
        }

        Ok(CheckerOptions {
            policy: ComparisonPolicy {
                check_block_height: self.check_block_height || config.check.check_block_height,
            },
            fetch_timeout: Some(Duration::from_secs(fetch_timeout)),
            concurrency,
        })
    }
}
