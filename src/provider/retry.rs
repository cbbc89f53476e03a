//! Retry logic utilities for provider transports
//!
//! This module provides helper functions for implementing exponential backoff
//! retry logic and timeout wrappers around blocking client calls.

use crate::errors::{ProviderError, ProviderResult};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinError;
use tokio::time::error::Elapsed;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, warn};

/// Backoff settings shared by the network-backed providers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_seconds: u64,
}

/// Calculate next backoff duration using exponential backoff with a maximum cap
///
/// `new_backoff = min(current_backoff * multiplier, max_backoff)`
///
/// # Example
/// ```
/// use std::time::Duration;
/// use chain_consistency::provider::retry::calculate_next_backoff;
///
/// let backoff = Duration::from_millis(100);
/// let next = calculate_next_backoff(backoff, 2.0, 30);
/// assert_eq!(next, Duration::from_millis(200));
/// ```
pub fn calculate_next_backoff(
    current_backoff: Duration,
    multiplier: f64,
    max_backoff_seconds: u64,
) -> Duration {
    Duration::from_millis((current_backoff.as_millis() as f64 * multiplier) as u64)
        .min(Duration::from_secs(max_backoff_seconds))
}

/// Execute a blocking client operation on the blocking pool with a timeout
///
/// # Returns
/// `Result<Result<ProviderResult<T>, JoinError>, Elapsed>`
/// - Outer Result: Timeout result (Err = timeout elapsed)
/// - Middle Result: spawn_blocking result (Err = task panic/failure)
/// - Inner ProviderResult<T>: operation result
pub async fn execute_with_timeout<T, F>(
    timeout_seconds: u64,
    operation: F,
) -> Result<Result<ProviderResult<T>, JoinError>, Elapsed>
where
    T: Send + 'static,
    F: FnOnce() -> ProviderResult<T> + Send + 'static,
{
    timeout(
        Duration::from_secs(timeout_seconds),
        tokio::task::spawn_blocking(operation),
    )
    .await
}

/// Flatten the nested result of [`execute_with_timeout`] into a provider error
pub fn flatten_blocking_result<T>(
    result: Result<Result<ProviderResult<T>, JoinError>, Elapsed>,
    timeout_seconds: u64,
    operation: &str,
) -> ProviderResult<T> {
    match result {
        Ok(Ok(inner)) => inner,
        Ok(Err(e)) => Err(ProviderError::Transport(format!(
            "Task execution error in {}: {}",
            operation, e
        ))),
        Err(_) => Err(ProviderError::Timeout {
            timeout: Duration::from_secs(timeout_seconds),
            operation: operation.to_string(),
        }),
    }
}

/// Run `attempt` until it succeeds, fails with a non-retryable error, or the
/// policy's attempt budget is spent
///
/// `DataUnavailable` is returned immediately; transport failures and timeouts
/// are retried with exponential backoff. The last error is returned once
/// retries are exhausted.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut attempt: F,
) -> ProviderResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProviderResult<T>>,
{
    let max_attempts = policy.max_retries.max(1);
    let mut backoff = Duration::from_millis(policy.initial_backoff_ms);
    let mut attempts = 0;

    loop {
        attempts += 1;
        match attempt().await {
            Ok(value) => {
                if attempts > 1 {
                    debug!("{} succeeded after {} attempts", operation, attempts);
                }
                return Ok(value);
            }
            Err(e) if !e.is_retryable() => {
                debug!("{} failed (non-retryable): {}", operation, e);
                return Err(e);
            }
            Err(e) => {
                if attempts >= max_attempts {
                    error!("{} failed after {} attempts: {}", operation, attempts, e);
                    return Err(e);
                }

                warn!(
                    "Attempt {} of {} failed, retrying in {:?}: {}",
                    attempts, operation, backoff, e
                );
                sleep(backoff).await;

                backoff = calculate_next_backoff(
                    backoff,
                    policy.backoff_multiplier,
                    policy.max_backoff_seconds,
                );
            }
        }
    }
}
