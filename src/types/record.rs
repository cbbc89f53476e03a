//! Canonical transaction record model
//!
//! Every provider normalises its native payload into these types. Fields a
//! backend cannot supply are `None` ("unknown"), never a placeholder value.

use serde::{Deserialize, Serialize};

/// One input or output entry of a transaction
///
/// Inputs and outputs share a shape: for an input, `index` is the position
/// of the spent output in its creating transaction and `value`/`address`
/// describe that spent output; for an output, `index` is its own position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionIo {
    pub index: u32,
    /// Amount in satoshis
    pub value: u64,
    /// Canonical address, empty when the provider cannot resolve one
    #[serde(default)]
    pub address: String,
    /// Provider-internal reference to the creating transaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tx_index: Option<u64>,
}

pub type TransactionInput = TransactionIo;
pub type TransactionOutput = TransactionIo;

impl TransactionIo {
    pub fn new(index: u32, value: u64, address: impl Into<String>) -> Self {
        Self {
            index,
            value,
            address: address.into(),
            source_tx_index: None,
        }
    }

    pub fn with_source_tx_index(mut self, source_tx_index: u64) -> Self {
        self.source_tx_index = Some(source_tx_index);
        self
    }
}

/// A transaction as observed by one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub txid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
    /// Seconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
}

impl TransactionRecord {
    pub fn total_input_value(&self) -> u64 {
        self.inputs.iter().map(|i| i.value).sum()
    }

    pub fn total_output_value(&self) -> u64 {
        self.outputs.iter().map(|o| o.value).sum()
    }
}
