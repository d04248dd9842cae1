//! # Settlement Backend
//!
//! After a successful signing round the workflow POSTs the customer-signed
//! leg and the unsigned vendor leg to the settlement backend, which owns
//! verification, co-signing, and ledger submission. Delivery is
//! fire-and-forget from the workflow's perspective: the outcome is logged,
//! never a blocking UI state.

use std::time::Duration;

use async_trait::async_trait;
use lib_core::AppError;
use reqwest::Client;
use shared::dto::settlement::SettlementRequest;
use tracing::info;

/// Settlement backend boundary.
#[async_trait]
pub trait SettlementSink: Send + Sync {
    async fn submit(&self, request: &SettlementRequest) -> Result<(), AppError>;
}

/// POSTs settlement requests to the backend's fixed endpoint.
pub struct HttpSettlementClient {
    http: Client,
    url: String,
}

impl HttpSettlementClient {
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
impl SettlementSink for HttpSettlementClient {
    async fn submit(&self, request: &SettlementRequest) -> Result<(), AppError> {
        let response = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Network(format!("settlement request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!(
                "settlement backend returned {}",
                status
            )));
        }

        info!(
            "settlement accepted for transaction {}",
            request.signed_transaction.tx_id
        );
        Ok(())
    }
}
