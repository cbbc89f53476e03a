use super::RpcArgs;
use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::rpc::BitcoindRpcProvider;
use clap::Args;
use tracing::{error, info};

/// Check that the bitcoind provider can reach its node
#[derive(Args)]
pub struct TestRpcCommand {
    #[command(flatten)]
    pub rpc: RpcArgs,
}

impl TestRpcCommand {
    pub async fn run(&self, config: AppConfig) -> AppResult<()> {
        let mut rpc_config = config.bitcoin_rpc;
        self.rpc.apply(&mut rpc_config);
        info!("Probing bitcoind at {} as {}", rpc_config.url, rpc_config.username);

        let url = rpc_config.url.clone();
        let provider = BitcoindRpcProvider::new(rpc_config)?;
        if let Err(e) = provider.test_connection().await {
            error!("getblockchaininfo against {} failed: {}", url, e);
            print!("{}", failure_hints(&url, &e.to_string()));
            return Err(AppError::Config(format!("bitcoind unreachable: {}", e)));
        }

        println!("bitcoind at {} is reachable", url);
        println!("Note: the bitcoind provider resolves input values from previous transactions and needs -txindex=1");
        Ok(())
    }
}

fn failure_hints(url: &str, reason: &str) -> String {
    format!(
        "bitcoind at {} is NOT reachable: {}\n\
         Check that:\n\
         \x20 - bitcoind is running with -server=1 and -txindex=1\n\
         \x20 - the URL is right (--rpc-url, BITCOIN_RPC_URL or [bitcoin_rpc] url)\n\
         \x20 - the credentials match rpcuser/rpcpassword (or rpcauth) in bitcoin.conf\n",
        url, reason
    )
}
