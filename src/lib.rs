//! Bitcoin Transaction Provider Consistency Checker
//!
//! Cross-validates transaction data served by independent backends (Bitcoin
//! Core RPC, the blockchain.info web API, recorded snapshots) against a set
//! of known-good fixtures.

pub mod cli;
pub mod comparator;
pub mod config;
pub mod errors;
pub mod fixtures;
pub mod provider;
pub mod rpc;
pub mod types;
pub mod web_api;
