use super::TransactionProvider;
use crate::errors::{AppResult, ProviderError, ProviderResult};
use crate::types::TransactionRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Offline provider serving previously recorded transaction records
///
/// Each fetch returns a fresh clone, so no state is shared between pairs.
pub struct SnapshotProvider {
    name: String,
    records: HashMap<String, TransactionRecord>,
}

impl SnapshotProvider {
    pub fn from_records(name: impl Into<String>, records: Vec<TransactionRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.txid.to_ascii_lowercase(), record))
            .collect();
        Self {
            name: name.into(),
            records,
        }
    }

    /// Load a JSON array of [`TransactionRecord`]s
    pub fn from_json_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        let records: Vec<TransactionRecord> = serde_json::from_str(&content)?;
        info!(
            "Loaded {} snapshot records from {}",
            records.len(),
            path.display()
        );
        Ok(Self::from_records("snapshot", records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl TransactionProvider for SnapshotProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_transaction(&self, txid: &str) -> ProviderResult<TransactionRecord> {
        match self.records.get(&txid.to_ascii_lowercase()) {
            Some(record) => Ok(record.clone()),
            None => {
                debug!("Snapshot {} has no record for {}", self.name, txid);
                Err(ProviderError::DataUnavailable {
                    txid: txid.to_string(),
                })
            }
        }
    }
}
