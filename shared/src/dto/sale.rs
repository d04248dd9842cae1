//! Sale descriptor feed schema.
//!
//! A sale descriptor is a read-only JSON document fetched once per checkout
//! session. It names the asset being sold, the asset accepted as payment,
//! the sale window, the exchange ratio, and the vendor's address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Network a sale settles on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
    TestNet,
    MainNet,
}

impl ChainId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainId::TestNet => "testnet",
            ChainId::MainNet => "mainnet",
        }
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChainId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "testnet" => Ok(ChainId::TestNet),
            "mainnet" => Ok(ChainId::MainNet),
            other => Err(format!("unknown chain: {}", other)),
        }
    }
}

/// Immutable snapshot of an on-chain asset's parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// On-chain asset index
    pub asset_index: u64,
    /// Number of decimal places in the display representation
    pub decimals: u32,
    /// Short ticker-style unit name
    pub unit_name: String,
    /// Human-readable asset name
    pub display_name: String,
    /// Total supply in base units
    pub total_supply: u64,
    /// Whether holdings of this asset start frozen
    pub frozen_by_default: bool,
}

/// Sale descriptor. Read-only after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleTerms {
    /// Asset being sold (vendor → customer leg)
    pub sale_token: AssetDescriptor,
    /// Asset accepted as payment (customer → vendor leg)
    pub accept_token: AssetDescriptor,
    /// Sale window start, unix seconds UTC
    pub sale_start: i64,
    /// Sale window end, unix seconds UTC
    pub sale_end: i64,
    /// Accept-token units charged per sale-token unit
    pub accept_unit_ratio: f64,
    /// Vendor address that receives payment and sends the sale token
    pub vendor_address: String,
    /// Network the sale settles on
    pub chain: ChainId,
}

/// Where the current moment falls relative to the sale window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalePhase {
    /// Sale has not opened yet
    Pending,
    /// Sale is open for purchases
    Ongoing,
    /// Sale window has closed
    Ended,
}

impl SaleTerms {
    /// Sale phase at the given moment.
    pub fn phase_at(&self, now: DateTime<Utc>) -> SalePhase {
        let now = now.timestamp();
        if now < self.sale_start {
            SalePhase::Pending
        } else if now < self.sale_end {
            SalePhase::Ongoing
        } else {
            SalePhase::Ended
        }
    }
}
