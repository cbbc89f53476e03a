//! Bitcoin Core RPC provider
//!
//! - **Client** - [`BitcoindRpcProvider`], a blocking `corepc-client` driven
//!   from the tokio blocking pool with per-call timeout and backoff retries
//! - **Address** - scriptPubKey to canonical address conversion

pub mod address;
pub mod client;

pub use address::address_from_script;
pub use client::{normalise_transaction, BitcoindRpcProvider};
