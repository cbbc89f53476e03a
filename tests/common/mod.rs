//! Common Test Utilities
//!
//! Shared providers, fixture builders and file helpers used by both the unit
//! and integration test trees.

#![allow(dead_code)]

pub mod rpc_helpers;

use async_trait::async_trait;
use chain_consistency::errors::{ProviderError, ProviderResult};
use chain_consistency::fixtures::FixtureSet;
use chain_consistency::provider::{SnapshotProvider, TransactionProvider};
use chain_consistency::types::TransactionRecord;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// In-memory provider with a canned answer (and optional latency) per txid
///
/// Unknown txids answer `DataUnavailable`.
pub struct ScriptedProvider {
    name: String,
    responses: HashMap<String, ProviderResult<TransactionRecord>>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            responses: HashMap::new(),
            delays: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_record(mut self, record: TransactionRecord) -> Self {
        self.responses.insert(record.txid.clone(), Ok(record));
        self
    }

    pub fn with_error(mut self, txid: &str, error: ProviderError) -> Self {
        self.responses.insert(txid.to_string(), Err(error));
        self
    }

    pub fn with_delay(mut self, txid: &str, delay: Duration) -> Self {
        self.delays.insert(txid.to_string(), delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_transaction(&self, txid: &str) -> ProviderResult<TransactionRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(txid) {
            tokio::time::sleep(*delay).await;
        }
        self.responses
            .get(txid)
            .cloned()
            .unwrap_or_else(|| {
                Err(ProviderError::DataUnavailable {
                    txid: txid.to_string(),
                })
            })
    }
}

pub fn builtin_fixtures() -> FixtureSet {
    FixtureSet::builtin().unwrap()
}

/// Records a fully-informed, correct provider would return for `fixtures`
pub fn correct_records(fixtures: &FixtureSet) -> Vec<TransactionRecord> {
    fixtures.fixtures().iter().map(|f| f.to_record()).collect()
}

/// Provider that agrees with every fixture in `fixtures`
pub fn mirror_provider(name: &str, fixtures: &FixtureSet) -> Arc<dyn TransactionProvider> {
    Arc::new(SnapshotProvider::from_records(name, correct_records(fixtures)))
}

/// Blank out every optional field, as a provider with no index data would
pub fn without_optionals(mut record: TransactionRecord) -> TransactionRecord {
    record.timestamp = None;
    record.block_height = None;
    for io in record.inputs.iter_mut().chain(record.outputs.iter_mut()) {
        io.source_tx_index = None;
    }
    record
}

pub fn write_json<T: Serialize + ?Sized>(dir: &Path, file_name: &str, value: &T) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

/// Path to a file under tests/test_data
pub fn test_data_path(file_name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("test_data")
        .join(file_name)
}
