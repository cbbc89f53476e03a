pub mod check;
pub mod fetch;
pub mod fixtures;
pub mod test_rpc;

use crate::config::{AppConfig, BitcoinRpcConfig};
use crate::errors::AppResult;
use crate::fixtures::FixtureSet;
use clap::Args;
use tracing::info;

/// Bitcoin RPC connection overrides shared by every command that talks to a node
#[derive(Args, Debug, Clone, Default)]
pub struct RpcArgs {
    /// Bitcoin RPC URL (overrides config.toml)
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Bitcoin RPC username (overrides config.toml)
    #[arg(long)]
    pub rpc_username: Option<String>,

    /// Bitcoin RPC password (overrides config.toml)
    #[arg(long)]
    pub rpc_password: Option<String>,
}

impl RpcArgs {
    pub fn apply(&self, rpc_config: &mut BitcoinRpcConfig) {
        if let Some(url) = &self.rpc_url {
            rpc_config.url = url.clone();
        }
        if let Some(username) = &self.rpc_username {
            rpc_config.username = username.clone();
        }
        if let Some(password) = &self.rpc_password {
            rpc_config.password = password.clone();
        }
    }
}

/// Resolve the fixture set: `--fixtures` first, then `check.fixtures`, then the built-ins
pub fn load_fixtures(pattern: Option<&str>, config: &AppConfig) -> AppResult<FixtureSet> {
    match pattern.or(config.check.fixtures.as_deref()) {
        Some(pattern) => FixtureSet::load_glob(pattern),
        None => {
            info!("Using built-in mainnet fixtures");
            FixtureSet::builtin()
        }
    }
}
