//! Bitcoin RPC and web API test configuration
//!
//! Retry budgets are kept small and backoffs short so that failure paths
//! resolve in milliseconds.

use chain_consistency::config::{BitcoinRpcConfig, WebApiConfig};

/// Standard test RPC URL (localhost)
pub const TEST_RPC_URL: &str = "http://localhost:8332";

pub const TEST_RPC_USERNAME: &str = "bitcoin";

pub const TEST_RPC_PASSWORD: &str = "bitcoin";

/// Address nothing listens on
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

pub fn create_test_rpc_config() -> BitcoinRpcConfig {
    BitcoinRpcConfig {
        url: TEST_RPC_URL.to_string(),
        username: TEST_RPC_USERNAME.to_string(),
        password: TEST_RPC_PASSWORD.to_string(),
        max_retries: 2,
        initial_backoff_ms: 1,
        timeout_seconds: 5,
        backoff_multiplier: 1.5,
        max_backoff_seconds: 1,
    }
}

pub fn create_test_web_api_config(base_url: &str, max_retries: usize) -> WebApiConfig {
    WebApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        max_retries,
        initial_backoff_ms: 1,
        backoff_multiplier: 1.5,
        max_backoff_seconds: 1,
    }
}
