//! Settlement backend request body.

use serde::{Deserialize, Serialize};

use super::signing::SignatureRecord;

/// Body POSTed to the settlement backend after a successful signing round.
///
/// Carries the customer-signed leg plus the vendor leg still in unsigned
/// canonical form (base64), so the backend can co-sign and submit the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRequest {
    #[serde(rename = "signedTransaction")]
    pub signed_transaction: SignatureRecord,
    #[serde(rename = "unsignedTransaction")]
    pub unsigned_transaction: String,
}
