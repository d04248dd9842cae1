//! # Sale Terms Feed
//!
//! The sale descriptor is a read-only JSON document at a fixed URL, fetched
//! once per checkout session. Failure surfaces as a user-visible alert; no
//! retry.

use std::time::Duration;

use async_trait::async_trait;
use lib_core::AppError;
use reqwest::Client;
use shared::dto::sale::SaleTerms;
use tracing::debug;

/// Read-only source of the sale descriptor.
#[async_trait]
pub trait SaleTermsSource: Send + Sync {
    async fn fetch(&self) -> Result<SaleTerms, AppError>;
}

/// Fetches the descriptor from its feed URL.
pub struct HttpSaleTermsClient {
    http: Client,
    url: String,
}

impl HttpSaleTermsClient {
    pub fn new(url: impl Into<String>) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SaleTermsSource for HttpSaleTermsClient {
    async fn fetch(&self) -> Result<SaleTerms, AppError> {
        debug!("fetching sale terms from {}", self.url);

        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("sale terms request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!(
                "sale terms feed returned {}",
                status
            )));
        }

        response
            .json::<SaleTerms>()
            .await
            .map_err(|e| AppError::Malformed(format!("sale terms undecodable: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use shared::dto::sale::{ChainId, SaleTerms};

    #[test]
    fn test_feed_document_decodes() {
        let document = r#"{
            "sale_token": {
                "asset_index": 52674863,
                "decimals": 0,
                "unit_name": "SEED",
                "display_name": "SproutCoin",
                "total_supply": 1000000,
                "frozen_by_default": false
            },
            "accept_token": {
                "asset_index": 31566704,
                "decimals": 6,
                "unit_name": "USDC",
                "display_name": "USD Coin",
                "total_supply": 18446744073709551615,
                "frozen_by_default": false
            },
            "sale_start": 1700000000,
            "sale_end": 1800000000,
            "accept_unit_ratio": 4.0,
            "vendor_address": "VENDOR7XQ5YTNPWD4RLBGHIJ2KM3OA6SE",
            "chain": "testnet"
        }"#;

        let terms: SaleTerms = serde_json::from_str(document).unwrap();

        assert_eq!(terms.sale_token.asset_index, 52_674_863);
        assert_eq!(terms.accept_unit_ratio, 4.0);
        assert_eq!(terms.chain, ChainId::TestNet);
    }
}
