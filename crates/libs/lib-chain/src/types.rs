//! Chain query response types.
//!
//! The node's read API uses kebab-case field names on the wire.

use serde::{Deserialize, Serialize};

/// Network-supplied defaults needed to construct a valid transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxnParams {
    /// Suggested fee in micro-units per transaction
    pub fee: u64,
    /// Network minimum fee; the suggested fee never undercuts this
    #[serde(rename = "min-fee")]
    pub min_fee: u64,
    /// First round the transaction is valid in
    #[serde(rename = "first-valid")]
    pub first_valid: u64,
    /// Last round the transaction is valid in
    #[serde(rename = "last-valid")]
    pub last_valid: u64,
    /// Network genesis identifier
    #[serde(rename = "genesis-id")]
    pub genesis_id: String,
}

/// One asset position held by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetHolding {
    /// On-chain asset index
    #[serde(rename = "asset-id")]
    pub asset_index: u64,
    /// Balance in base units
    pub amount: u64,
    /// Whether the holding is currently frozen
    #[serde(rename = "is-frozen", default)]
    pub frozen: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_decode_from_node_document() {
        let doc = r#"{
            "fee": 1000,
            "min-fee": 1000,
            "first-valid": 7000000,
            "last-valid": 7001000,
            "genesis-id": "testnet-v1.0"
        }"#;

        let params: TxnParams = serde_json::from_str(doc).unwrap();

        assert_eq!(params.fee, 1000);
        assert_eq!(params.first_valid, 7_000_000);
        assert_eq!(params.genesis_id, "testnet-v1.0");
    }

    #[test]
    fn test_holding_frozen_defaults_false() {
        let doc = r#"{"asset-id": 52674863, "amount": 12}"#;

        let holding: AssetHolding = serde_json::from_str(doc).unwrap();

        assert_eq!(holding.asset_index, 52_674_863);
        assert!(!holding.frozen);
    }
}
