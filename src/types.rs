//! Data types for the provider consistency checker
//!
//! - **record** - canonical transaction model every provider normalises into
//! - **report** - per-pair outcomes and diagnostics of a consistency run

pub mod record;
pub mod report;

pub use record::{TransactionInput, TransactionIo, TransactionOutput, TransactionRecord};
pub use report::{Diagnostic, Outcome, PairResult, Report, ReportSummary};
