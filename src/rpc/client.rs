use crate::config::BitcoinRpcConfig;
use crate::errors::{ProviderError, ProviderResult};
use crate::provider::retry::{execute_with_timeout, flatten_blocking_result, retry_with_backoff};
use crate::provider::TransactionProvider;
use crate::rpc::address::address_from_script;
use crate::types::{TransactionIo, TransactionRecord};
use async_trait::async_trait;
use corepc_client::bitcoin::{consensus, Transaction, TxOut, Txid};
use corepc_client::client_sync::{v28::Client, Auth};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

const PROVIDER_NAME: &str = "bitcoind";

/// Block metadata from `getrawtransaction <txid> true`; absent while unconfirmed
#[derive(Debug, Deserialize)]
struct VerboseTransactionMeta {
    blockhash: Option<String>,
    blocktime: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct BlockHeaderMeta {
    height: u64,
}

/// Bitcoin Core backed provider
///
/// Transactions are decoded from raw hex so amounts are exact satoshis.
/// Input values and addresses come from the spent outputs of the previous
/// transactions, which requires a node running with `-txindex`. A node has
/// no internal transaction index, so `source_tx_index` is always unknown.
pub struct BitcoindRpcProvider {
    client: Arc<Client>,
    config: BitcoinRpcConfig,
}

impl BitcoindRpcProvider {
    /// Create the provider; no request is made until the first fetch
    pub fn new(config: BitcoinRpcConfig) -> ProviderResult<Self> {
        let client = Self::create_sync_client(&config)?;
        Ok(Self { client, config })
    }

    /// Check the node answers `getblockchaininfo`
    pub async fn test_connection(&self) -> ProviderResult<()> {
        let client = Arc::clone(&self.client);
        let result = execute_with_timeout(self.config.timeout_seconds, move || {
            let info = client
                .get_blockchain_info()
                .map_err(|e| ProviderError::Transport(format!("get_blockchain_info: {}", e)))?;
            debug!(
                "Bitcoin Core connection test successful - chain: {}, blocks: {}",
                info.chain, info.blocks
            );
            Ok(())
        })
        .await;

        flatten_blocking_result(result, self.config.timeout_seconds, "connection_test")
    }

    fn create_sync_client(config: &BitcoinRpcConfig) -> ProviderResult<Arc<Client>> {
        let auth = Auth::UserPass(config.username.clone(), config.password.clone());
        let client = Client::new_with_auth(&config.url, auth).map_err(|e| {
            ProviderError::Transport(format!("Failed to create Bitcoin RPC client: {}", e))
        })?;

        Ok(Arc::new(client))
    }

    /// Run one blocking client call with per-attempt timeout and retries
    async fn call_with_retry<T, F>(&self, operation: String, call: F) -> ProviderResult<T>
    where
        T: Send + 'static,
        F: Fn(&Client) -> ProviderResult<T> + Clone + Send + 'static,
    {
        let policy = self.config.retry_policy();
        let timeout_seconds = self.config.timeout_seconds;

        retry_with_backoff(&policy, &operation, || {
            let client = Arc::clone(&self.client);
            let call = call.clone();
            let operation = operation.clone();
            async move {
                let result = execute_with_timeout(timeout_seconds, move || call(&client)).await;
                flatten_blocking_result(result, timeout_seconds, &operation)
            }
        })
        .await
    }

    async fn call_json<T>(
        &self,
        method: &'static str,
        args: Vec<serde_json::Value>,
    ) -> ProviderResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let operation = format!("{}({})", method, join_args(&args));
        self.call_with_retry(operation, move |client| {
            client
                .call::<T>(method, &args)
                .map_err(|e| classify_rpc_error(&args, method, e.to_string()))
        })
        .await
    }

    async fn get_raw_transaction(&self, txid: Txid) -> ProviderResult<Transaction> {
        self.call_with_retry(format!("get_raw_transaction({})", txid), move |client| {
            let raw_result = client.get_raw_transaction(txid).map_err(|e| {
                classify_rpc_error(
                    &[serde_json::json!(txid.to_string())],
                    "get_raw_transaction",
                    e.to_string(),
                )
            })?;

            let tx_bytes = hex::decode(&raw_result.0).map_err(|e| {
                ProviderError::Transport(format!("Failed to decode raw transaction hex: {}", e))
            })?;
            consensus::deserialize::<Transaction>(&tx_bytes).map_err(|e| {
                ProviderError::Transport(format!("Failed to deserialise raw transaction: {}", e))
            })
        })
        .await
    }

    /// Block height and block time, both unknown for mempool transactions
    async fn get_confirmation(&self, txid: Txid) -> ProviderResult<(Option<u64>, Option<u64>)> {
        let meta: VerboseTransactionMeta = self
            .call_json(
                "getrawtransaction",
                vec![serde_json::json!(txid.to_string()), serde_json::json!(true)],
            )
            .await?;

        let height = match meta.blockhash {
            Some(blockhash) => {
                let header: BlockHeaderMeta = self
                    .call_json("getblockheader", vec![serde_json::json!(blockhash)])
                    .await?;
                Some(header.height)
            }
            None => None,
        };

        Ok((height, meta.blocktime))
    }

    /// The outputs spent by each input, in input order
    async fn get_spent_outputs(&self, transaction: &Transaction) -> ProviderResult<Vec<TxOut>> {
        let mut spent = Vec::with_capacity(transaction.input.len());

        for (position, input) in transaction.input.iter().enumerate() {
            if input.previous_output.is_null() {
                return Err(ProviderError::Transport(format!(
                    "input {} is a coinbase input and has no spent output",
                    position
                )));
            }

            let prev_txid = input.previous_output.txid;
            let prev_vout = input.previous_output.vout;

            let prev_tx = self.get_raw_transaction(prev_txid).await.map_err(|e| match e {
                ProviderError::DataUnavailable { txid } => ProviderError::Transport(format!(
                    "previous transaction {} unavailable (is -txindex enabled?)",
                    txid
                )),
                other => other,
            })?;

            let output = prev_tx.output.get(prev_vout as usize).cloned().ok_or_else(|| {
                ProviderError::Transport(format!(
                    "previous transaction {} has no output {}",
                    prev_txid, prev_vout
                ))
            })?;
            debug!(
                "Input {} spends {}:{} ({} sats)",
                position,
                prev_txid,
                prev_vout,
                output.value.to_sat()
            );
            spent.push(output);
        }

        Ok(spent)
    }
}

#[async_trait]
impl TransactionProvider for BitcoindRpcProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_transaction(&self, txid: &str) -> ProviderResult<TransactionRecord> {
        let tx_hash = Txid::from_str(txid)
            .map_err(|_| ProviderError::Transport(format!("Invalid txid: {}", txid)))?;

        let transaction = self.get_raw_transaction(tx_hash).await?;
        let (block_height, timestamp) = self.get_confirmation(tx_hash).await?;
        let spent_outputs = self.get_spent_outputs(&transaction).await?;

        info!(
            "Fetched {} from bitcoind ({} inputs, {} outputs)",
            txid,
            transaction.input.len(),
            transaction.output.len()
        );

        Ok(normalise_transaction(
            &transaction,
            &spent_outputs,
            block_height,
            timestamp,
        ))
    }
}

/// Build the canonical record from a decoded transaction and its spent outputs
///
/// `spent_outputs[i]` must be the output spent by `transaction.input[i]`.
pub fn normalise_transaction(
    transaction: &Transaction,
    spent_outputs: &[TxOut],
    block_height: Option<u64>,
    timestamp: Option<u64>,
) -> TransactionRecord {
    let inputs = transaction
        .input
        .iter()
        .zip(spent_outputs)
        .map(|(input, spent)| {
            TransactionIo::new(
                input.previous_output.vout,
                spent.value.to_sat(),
                address_from_script(spent.script_pubkey.as_bytes()).unwrap_or_default(),
            )
        })
        .collect();

    let outputs = transaction
        .output
        .iter()
        .enumerate()
        .map(|(n, output)| {
            TransactionIo::new(
                n as u32,
                output.value.to_sat(),
                address_from_script(output.script_pubkey.as_bytes()).unwrap_or_default(),
            )
        })
        .collect();

    TransactionRecord {
        txid: transaction.compute_txid().to_string(),
        block_height,
        timestamp,
        inputs,
        outputs,
    }
}

/// Map a node error message onto the provider error taxonomy
fn classify_rpc_error(args: &[serde_json::Value], method: &str, message: String) -> ProviderError {
    if message.contains("No such mempool or blockchain transaction")
        || message.contains("Invalid or non-wallet transaction id")
    {
        let txid = args
            .first()
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        return ProviderError::DataUnavailable { txid };
    }
    ProviderError::Transport(format!("RPC call failed: {} - {}", method, message))
}

fn join_args(args: &[serde_json::Value]) -> String {
    args.iter()
        .map(|v| match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
