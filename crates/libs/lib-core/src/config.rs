//! # Application Configuration
//!
//! This module manages application configuration loaded from environment
//! variables. All configuration is validated on startup to fail fast if
//! misconfigured.
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance:
//!
//! ```rust,no_run
//! use lib_core::config::core_config;
//!
//! let config = core_config();
//! let feed = &config.sale_terms_url;
//! ```
//!
//! The config must be initialized once at application startup using
//! [`init_config()`].

use std::sync::OnceLock;

use lib_utils::envs::{get_env_or, get_env_parse};
use lib_utils::validation::validate_http_url;
use shared::dto::sale::ChainId;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Bridge endpoint the wallet session handshake goes through
    pub bridge_url: String,

    /// Fixed URL of the sale descriptor feed (read-only JSON document)
    pub sale_terms_url: String,

    /// Settlement backend that receives the signed/unsigned pair
    pub settlement_url: String,

    /// Network purchases settle on unless the sale descriptor says otherwise
    pub chain: ChainId,

    /// Chain query node, test network
    pub testnet_node_url: String,

    /// Chain query node, main network
    pub mainnet_node_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable has a development default, so a bare environment
    /// yields a config pointed at local services and the public bridge.
    pub fn from_env() -> Result<Self, String> {
        let bridge_url = get_env_or("WALLET_BRIDGE_URL", "https://bridge.walletconnect.org");

        let sale_terms_url = get_env_or(
            "SALE_TERMS_URL",
            "https://tokensales-staging.s3.eu-west-2.amazonaws.com/SproutCoin-52674863.json",
        );

        let settlement_url = get_env_or("SETTLEMENT_URL", "http://localhost:8000/");

        let chain = match std::env::var("CHAIN") {
            Ok(_) => get_env_parse::<ChainId>("CHAIN")
                .map_err(|e| format!("CHAIN must be testnet or mainnet: {}", e))?,
            Err(_) => ChainId::TestNet,
        };

        let testnet_node_url = get_env_or("TESTNET_NODE_URL", "http://localhost:4001");
        let mainnet_node_url = get_env_or("MAINNET_NODE_URL", "http://localhost:4002");

        Ok(Self {
            bridge_url,
            sale_terms_url,
            settlement_url,
            chain,
            testnet_node_url,
            mainnet_node_url,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        validate_http_url(&self.bridge_url, "WALLET_BRIDGE_URL")?;
        validate_http_url(&self.sale_terms_url, "SALE_TERMS_URL")?;
        validate_http_url(&self.settlement_url, "SETTLEMENT_URL")?;
        validate_http_url(&self.testnet_node_url, "TESTNET_NODE_URL")?;
        validate_http_url(&self.mainnet_node_url, "MAINNET_NODE_URL")?;
        Ok(())
    }

    /// Node base URL for the given network.
    pub fn node_url(&self, chain: ChainId) -> &str {
        match chain {
            ChainId::TestNet => &self.testnet_node_url,
            ChainId::MainNet => &self.mainnet_node_url,
        }
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration.
///
/// This should be called once at application startup, before any component
/// that needs configuration is constructed. Loads a `.env` file when one is
/// present.
///
/// # Errors
///
/// Returns an error if:
/// - Environment variables are invalid
/// - Configuration validation fails
/// - Config has already been initialized
pub fn init_config() -> Result<(), String> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| "Config has already been initialized".to_string())
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet. This ensures
/// configuration is always available when accessed.
pub fn core_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Config must be initialized with init_config() before use")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = Config::from_env().unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.chain, ChainId::TestNet);
    }

    #[test]
    fn test_node_url_selection() {
        let config = Config {
            bridge_url: "https://bridge.example".to_string(),
            sale_terms_url: "https://feed.example/sale.json".to_string(),
            settlement_url: "http://localhost:8000/".to_string(),
            chain: ChainId::TestNet,
            testnet_node_url: "http://localhost:4001".to_string(),
            mainnet_node_url: "http://localhost:4002".to_string(),
        };

        assert_eq!(config.node_url(ChainId::TestNet), "http://localhost:4001");
        assert_eq!(config.node_url(ChainId::MainNet), "http://localhost:4002");
    }
}
