use super::RpcArgs;
use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::provider::{build_provider, ProviderKind};
use crate::types::{TransactionIo, TransactionRecord};
use chrono::DateTime;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Fetch one transaction from a single provider
#[derive(Args)]
pub struct FetchCommand {
    /// Transaction ID to fetch
    pub txid: String,

    /// Provider to query
    #[arg(long, value_enum, default_value_t = ProviderKind::Bitcoind)]
    pub provider: ProviderKind,

    /// Recorded snapshot file for the snapshot provider
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Print the record as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub rpc: RpcArgs,
}

impl FetchCommand {
    pub async fn run(&self, mut config: AppConfig) -> AppResult<()> {
        self.rpc.apply(&mut config.bitcoin_rpc);
        let provider = build_provider(self.provider, &config, self.snapshot.as_deref())?;

        info!("Fetching {} from {}", self.txid, provider.name());
        let record = provider.fetch_transaction(&self.txid).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&record)?);
        } else {
            print!("{}", render_record(&record));
        }
        Ok(())
    }
}

fn render_record(record: &TransactionRecord) -> String {
    let mut out = format!("Transaction {}\n", record.txid);
    out.push_str(&format!(
        "  Block height: {}\n",
        record
            .block_height
            .map(|h| h.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    ));
    out.push_str(&format!("  Time:         {}\n", format_timestamp(record.timestamp)));

    out.push_str(&format!("  Inputs ({}):\n", record.inputs.len()));
    for input in &record.inputs {
        out.push_str(&format_io(input));
    }
    out.push_str(&format!("  Outputs ({}):\n", record.outputs.len()));
    for output in &record.outputs {
        out.push_str(&format_io(output));
    }
    out.push_str(&format!(
        "  Total in: {} sat, total out: {} sat\n",
        record.total_input_value(),
        record.total_output_value()
    ));
    out
}

fn format_io(io: &TransactionIo) -> String {
    let address = if io.address.is_empty() {
        "<none>"
    } else {
        io.address.as_str()
    };
    match io.source_tx_index {
        Some(tx_index) => format!(
            "    #{} {} sat -> {} (tx_index {})\n",
            io.index, io.value, address, tx_index
        ),
        None => format!("    #{} {} sat -> {}\n", io.index, io.value, address),
    }
}

fn format_timestamp(timestamp: Option<u64>) -> String {
    match timestamp {
        Some(ts) => match i64::try_from(ts).ok().and_then(|ts| DateTime::from_timestamp(ts, 0)) {
            Some(dt) => format!("{} ({})", dt.format("%Y-%m-%d %H:%M:%S UTC"), ts),
            None => ts.to_string(),
        },
        None => "unknown".to_string(),
    }
}
