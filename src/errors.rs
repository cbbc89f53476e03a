use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration issues (config file, environment, CLI arguments)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed fixture data, detected before any provider is queried
    #[error("Configuration error: fixture {fixture}: {reason}")]
    InvalidFixture { fixture: usize, reason: String },

    /// Provider operations outside of a consistency run (fetch, test-rpc)
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// File I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A completed run reported at least one failing pair
    #[error("Consistency check failed: {failed} of {total} pairs disagreed")]
    ConsistencyFailure { failed: usize, total: usize },

    /// The run was interrupted before every pair was checked
    #[error("Consistency check aborted after {completed} of {total} pairs")]
    Aborted { completed: usize, total: usize },
}

/// Provider error types
///
/// Every provider failure falls into one of two kinds (see [`ErrorKind`]):
/// the backend does not know the transaction, or the backend could not be
/// reached / returned something unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Transaction identifier is not known to this backend
    #[error("Transaction not found: {txid}")]
    DataUnavailable { txid: String },

    /// Connection refused, HTTP/RPC failure, or malformed response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request did not complete within the configured timeout
    #[error("Request timeout: {timeout:?} for {operation}")]
    Timeout {
        timeout: Duration,
        operation: String,
    },
}

/// Coarse classification of a [`ProviderError`], as recorded in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    DataUnavailable,
    Transport,
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::DataUnavailable { .. } => ErrorKind::DataUnavailable,
            ProviderError::Transport(_) | ProviderError::Timeout { .. } => ErrorKind::Transport,
        }
    }

    /// Whether retrying the same request could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::DataUnavailable => write!(f, "DataUnavailable"),
            ErrorKind::Transport => write!(f, "TransportError"),
        }
    }
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<glob::PatternError> for AppError {
    fn from(err: glob::PatternError) -> Self {
        AppError::Config(format!("Glob pattern error: {}", err))
    }
}

impl From<glob::GlobError> for AppError {
    fn from(err: glob::GlobError) -> Self {
        AppError::Config(format!("Glob error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
