use crate::config::WebApiConfig;
use crate::errors::{ProviderError, ProviderResult};
use crate::provider::retry::retry_with_backoff;
use crate::provider::TransactionProvider;
use crate::types::{TransactionIo, TransactionRecord};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const PROVIDER_NAME: &str = "blockchain-info";

/// `GET /rawtx/{txid}` response, restricted to the fields we compare
#[derive(Debug, Clone, Deserialize)]
pub struct RawTx {
    pub hash: String,
    pub time: Option<u64>,
    pub block_height: Option<u64>,
    pub inputs: Vec<RawInput>,
    pub out: Vec<RawOutput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawInput {
    /// Absent for coinbase inputs
    pub prev_out: Option<RawOutput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOutput {
    pub n: u32,
    pub value: u64,
    pub addr: Option<String>,
    pub tx_index: Option<u64>,
}

impl RawOutput {
    fn to_io(&self) -> TransactionIo {
        TransactionIo {
            index: self.n,
            value: self.value,
            address: self.addr.clone().unwrap_or_default(),
            source_tx_index: self.tx_index,
        }
    }
}

/// Convert a `rawtx` payload into the canonical record
pub fn normalise_raw_tx(raw: &RawTx) -> ProviderResult<TransactionRecord> {
    let inputs = raw
        .inputs
        .iter()
        .enumerate()
        .map(|(position, input)| {
            input.prev_out.as_ref().map(RawOutput::to_io).ok_or_else(|| {
                ProviderError::Transport(format!(
                    "input {} of {} has no prev_out (coinbase input)",
                    position, raw.hash
                ))
            })
        })
        .collect::<ProviderResult<Vec<_>>>()?;

    Ok(TransactionRecord {
        txid: raw.hash.clone(),
        block_height: raw.block_height,
        timestamp: raw.time,
        inputs,
        outputs: raw.out.iter().map(RawOutput::to_io).collect(),
    })
}

/// blockchain.info backed provider
pub struct BlockchainInfoProvider {
    client: Client,
    config: WebApiConfig,
}

impl BlockchainInfoProvider {
    pub fn new(config: WebApiConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn rawtx_url(&self, txid: &str) -> String {
        format!("{}/rawtx/{}", self.config.base_url.trim_end_matches('/'), txid)
    }

    async fn fetch_raw_tx(&self, txid: &str) -> ProviderResult<RawTx> {
        let url = self.rawtx_url(txid);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    timeout: Duration::from_secs(self.config.timeout_seconds),
                    operation: format!("GET {}", url),
                }
            } else {
                ProviderError::Transport(format!("GET {} failed: {}", url, e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::DataUnavailable {
                txid: txid.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            // The API answers unknown hashes with a 5xx and a plain-text message
            if body.to_ascii_lowercase().contains("not found") {
                return Err(ProviderError::DataUnavailable {
                    txid: txid.to_string(),
                });
            }
            return Err(ProviderError::Transport(format!(
                "GET {} returned HTTP {}",
                url, status
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| ProviderError::Transport(format!("Malformed rawtx response: {}", e)))
    }
}

#[async_trait]
impl TransactionProvider for BlockchainInfoProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_transaction(&self, txid: &str) -> ProviderResult<TransactionRecord> {
        let policy = self.config.retry_policy();
        let operation = format!("rawtx({})", txid);
        let raw = retry_with_backoff(&policy, &operation, || self.fetch_raw_tx(txid)).await?;

        info!(
            "Fetched {} from blockchain.info ({} inputs, {} outputs)",
            txid,
            raw.inputs.len(),
            raw.out.len()
        );
        normalise_raw_tx(&raw)
    }
}
