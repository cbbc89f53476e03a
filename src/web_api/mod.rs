//! Third-party web API providers

pub mod blockchain_info;

pub use blockchain_info::{normalise_raw_tx, BlockchainInfoProvider, RawTx};
