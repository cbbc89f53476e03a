//! Transaction provider abstraction
//!
//! A provider answers "what does transaction X look like" from one backend.
//! The comparator is written once against [`TransactionProvider`] and treats
//! every backend uniformly:
//! - **bitcoind** - Bitcoin Core JSON-RPC ([`crate::rpc::BitcoindRpcProvider`])
//! - **blockchain-info** - blockchain.info web API ([`crate::web_api::BlockchainInfoProvider`])
//! - **snapshot** - previously recorded records ([`SnapshotProvider`])

pub mod retry;
pub mod snapshot;

pub use retry::RetryPolicy;
pub use snapshot::SnapshotProvider;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult, ProviderResult};
use crate::rpc::BitcoindRpcProvider;
use crate::types::TransactionRecord;
use crate::web_api::BlockchainInfoProvider;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Capability contract for any source of transaction data
///
/// Implementations are read-only. Fields the backend cannot supply are
/// returned as `None`; a value that is present must be correct.
#[async_trait]
pub trait TransactionProvider: Send + Sync {
    /// Short identifier used in reports
    fn name(&self) -> &str;

    /// Fetch the backend's view of `txid`
    ///
    /// Fails with `DataUnavailable` if the backend does not know the
    /// transaction, or with a transport error if it cannot be reached or
    /// returns unusable data.
    async fn fetch_transaction(&self, txid: &str) -> ProviderResult<TransactionRecord>;
}

/// Providers selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderKind {
    Bitcoind,
    BlockchainInfo,
    Snapshot,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Bitcoind => "bitcoind",
            ProviderKind::BlockchainInfo => "blockchain-info",
            ProviderKind::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construct a provider from configuration
///
/// No network traffic happens here; an unreachable backend surfaces as a
/// transport error on its first fetch.
pub fn build_provider(
    kind: ProviderKind,
    config: &AppConfig,
    snapshot: Option<&Path>,
) -> AppResult<Arc<dyn TransactionProvider>> {
    let provider: Arc<dyn TransactionProvider> = match kind {
        ProviderKind::Bitcoind => Arc::new(BitcoindRpcProvider::new(config.bitcoin_rpc.clone())?),
        ProviderKind::BlockchainInfo => {
            Arc::new(BlockchainInfoProvider::new(config.web_api.clone())?)
        }
        ProviderKind::Snapshot => {
            let path = snapshot.ok_or_else(|| {
                AppError::Config(
                    "The snapshot provider requires --snapshot <PATH>".to_string(),
                )
            })?;
            Arc::new(SnapshotProvider::from_json_file(path)?)
        }
    };
    Ok(provider)
}
