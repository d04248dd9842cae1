//! # Chain Client
//!
//! Thin façade over the node's read-only HTTP endpoints: suggested
//! transaction parameters and account asset holdings, keyed by network.
//!
//! Failures surface once per call; no internal retries. Callers that feed
//! UI state are expected to degrade (empty holdings, alert) rather than
//! crash; callers on the submit path propagate.

use std::time::Duration;

use async_trait::async_trait;
use lib_core::AppError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use lib_core::Config;
use shared::dto::sale::ChainId;

use crate::types::{AssetHolding, TxnParams};

/// Chain query errors
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain query failed: {0}")]
    Network(String),

    #[error("chain response decode failed: {0}")]
    Decode(String),
}

impl From<ChainError> for AppError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Network(msg) => AppError::Network(msg),
            ChainError::Decode(msg) => AppError::Malformed(msg),
        }
    }
}

/// Node base URLs per network.
#[derive(Debug, Clone)]
pub struct ChainEndpoints {
    pub testnet: String,
    pub mainnet: String,
}

impl ChainEndpoints {
    pub fn from_config(config: &Config) -> Self {
        Self {
            testnet: config.testnet_node_url.clone(),
            mainnet: config.mainnet_node_url.clone(),
        }
    }

    pub fn base(&self, chain: ChainId) -> &str {
        match chain {
            ChainId::TestNet => &self.testnet,
            ChainId::MainNet => &self.mainnet,
        }
    }
}

/// Read-only chain queries.
///
/// The seam between transaction construction / holdings tracking and the
/// actual node, so both can run against a mock in tests.
#[async_trait]
pub trait ChainQueries: Send + Sync {
    /// Fetch current network fee/validity parameters.
    async fn suggested_params(&self, chain: ChainId) -> Result<TxnParams, ChainError>;

    /// Fetch the asset holdings of an account.
    async fn account_assets(
        &self,
        chain: ChainId,
        address: &str,
    ) -> Result<Vec<AssetHolding>, ChainError>;
}

/// HTTP client for the node's read API.
pub struct ChainClient {
    http: Client,
    endpoints: ChainEndpoints,
}

/// Account document subset returned by the node.
#[derive(Debug, Deserialize)]
struct AccountResponse {
    #[serde(default)]
    assets: Vec<AssetHolding>,
}

impl ChainClient {
    /// Create a new chain client with timeout configuration.
    pub fn new(endpoints: ChainEndpoints) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, endpoints })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, ChainError> {
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ChainError::Network(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChainError::Network(format!("{} returned {}", url, status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ChainError::Decode(format!("response from {} undecodable: {}", url, e)))
    }
}

#[async_trait]
impl ChainQueries for ChainClient {
    async fn suggested_params(&self, chain: ChainId) -> Result<TxnParams, ChainError> {
        debug!("fetching suggested params on {}", chain);
        let url = format!("{}/v2/transactions/params", self.endpoints.base(chain));
        self.get_json(url).await
    }

    async fn account_assets(
        &self,
        chain: ChainId,
        address: &str,
    ) -> Result<Vec<AssetHolding>, ChainError> {
        debug!("fetching account assets on {}", chain);
        let url = format!("{}/v2/accounts/{}", self.endpoints.base(chain), address);
        let account: AccountResponse = self.get_json(url).await?;
        Ok(account.assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_selection() {
        let endpoints = ChainEndpoints {
            testnet: "http://localhost:4001".to_string(),
            mainnet: "http://localhost:4002".to_string(),
        };

        assert_eq!(endpoints.base(ChainId::TestNet), "http://localhost:4001");
        assert_eq!(endpoints.base(ChainId::MainNet), "http://localhost:4002");
    }

    #[test]
    fn test_endpoints_from_config() {
        let config = Config {
            bridge_url: "https://bridge.example".to_string(),
            sale_terms_url: "https://feed.example/sale.json".to_string(),
            settlement_url: "http://localhost:8000/".to_string(),
            chain: ChainId::TestNet,
            testnet_node_url: "http://localhost:4001".to_string(),
            mainnet_node_url: "http://localhost:4002".to_string(),
        };

        let endpoints = ChainEndpoints::from_config(&config);

        assert_eq!(endpoints.base(config.chain), "http://localhost:4001");
    }

    #[test]
    fn test_account_document_without_assets() {
        let account: AccountResponse = serde_json::from_str(r#"{"address":"A"}"#).unwrap();
        assert!(account.assets.is_empty());
    }
}
