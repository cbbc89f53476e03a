use crate::provider::RetryPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub bitcoin_rpc: BitcoinRpcConfig,
    pub web_api: WebApiConfig,
    pub check: CheckConfig,
}

/// Bitcoin Core RPC provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitcoinRpcConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub timeout_seconds: u64,
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_seconds: u64,
}

impl Default for BitcoinRpcConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8332".to_string(),
            username: "bitcoin".to_string(),
            password: "password".to_string(),
            timeout_seconds: 60,
            max_retries: 10,
            initial_backoff_ms: 100,
            backoff_multiplier: 2.0,
            max_backoff_seconds: 30,
        }
    }
}

impl BitcoinRpcConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff_ms: self.initial_backoff_ms,
            backoff_multiplier: self.backoff_multiplier,
            max_backoff_seconds: self.max_backoff_seconds,
        }
    }
}

/// blockchain.info web API provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_seconds: u64,
}

impl Default for WebApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://blockchain.info".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            initial_backoff_ms: 500,
            backoff_multiplier: 2.0,
            max_backoff_seconds: 10,
        }
    }
}

impl WebApiConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff_ms: self.initial_backoff_ms,
            backoff_multiplier: self.backoff_multiplier,
            max_backoff_seconds: self.max_backoff_seconds,
        }
    }
}

/// Consistency run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Upper bound on a single provider fetch, retries included
    pub fetch_timeout_seconds: u64,
    /// Pairs fetched in parallel; 1 runs strictly sequentially
    pub concurrency: usize,
    /// Also compare block height (unknown-or-equal)
    pub check_block_height: bool,
    /// Glob pattern for fixture files; built-in fixtures when unset
    #[serde(default)]
    pub fixtures: Option<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_seconds: 300,
            concurrency: 1,
            check_block_height: false,
            fixtures: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from ./config.toml (if present) and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from `path` (required) or ./config.toml (optional),
    /// then apply environment overrides
    ///
    /// Environment variables take precedence over file configuration:
    /// `CONSISTENCY_<SECTION>__<KEY>` for any key, plus the shorthand
    /// `BITCOIN_RPC_URL`, `BITCOIN_RPC_USERNAME`, `BITCOIN_RPC_PASSWORD`,
    /// `WEB_API_BASE_URL` and `CONSISTENCY_FIXTURES`.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let rpc = BitcoinRpcConfig::default();
        let web = WebApiConfig::default();
        let check = CheckConfig::default();

        let file_source = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("config").required(false),
        };

        let config = Config::builder()
            // Bitcoin RPC defaults
            .set_default("bitcoin_rpc.url", rpc.url)?
            .set_default("bitcoin_rpc.username", rpc.username)?
            .set_default("bitcoin_rpc.password", rpc.password)?
            .set_default("bitcoin_rpc.timeout_seconds", rpc.timeout_seconds)?
            .set_default("bitcoin_rpc.max_retries", rpc.max_retries as i64)?
            .set_default("bitcoin_rpc.initial_backoff_ms", rpc.initial_backoff_ms)?
            .set_default("bitcoin_rpc.backoff_multiplier", rpc.backoff_multiplier)?
            .set_default("bitcoin_rpc.max_backoff_seconds", rpc.max_backoff_seconds)?
            // Web API defaults
            .set_default("web_api.base_url", web.base_url)?
            .set_default("web_api.timeout_seconds", web.timeout_seconds)?
            .set_default("web_api.max_retries", web.max_retries as i64)?
            .set_default("web_api.initial_backoff_ms", web.initial_backoff_ms)?
            .set_default("web_api.backoff_multiplier", web.backoff_multiplier)?
            .set_default("web_api.max_backoff_seconds", web.max_backoff_seconds)?
            // Run defaults
            .set_default("check.fetch_timeout_seconds", check.fetch_timeout_seconds)?
            .set_default("check.concurrency", check.concurrency as i64)?
            .set_default("check.check_block_height", check.check_block_height)?
            .add_source(file_source)
            .add_source(
                Environment::with_prefix("CONSISTENCY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        if let Ok(url) = env::var("BITCOIN_RPC_URL") {
            app_config.bitcoin_rpc.url = url;
        }
        if let Ok(username) = env::var("BITCOIN_RPC_USERNAME") {
            app_config.bitcoin_rpc.username = username;
        }
        if let Ok(password) = env::var("BITCOIN_RPC_PASSWORD") {
            app_config.bitcoin_rpc.password = password;
        }
        if let Ok(base_url) = env::var("WEB_API_BASE_URL") {
            app_config.web_api.base_url = base_url;
        }
        if let Ok(pattern) = env::var("CONSISTENCY_FIXTURES") {
            app_config.check.fixtures = Some(pattern);
        }

        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.check.concurrency == 0 {
            return Err(ConfigError::Message(
                "check.concurrency must be at least 1".to_string(),
            ));
        }
        if self.check.fetch_timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "check.fetch_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.bitcoin_rpc.max_retries == 0 || self.web_api.max_retries == 0 {
            return Err(ConfigError::Message(
                "max_retries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
