//! Wallet signing request/result wire format.
//!
//! A signing request is an ordered array of [`WalletTransaction`] entries;
//! the wallet signs and answers positionally, so index `i` of the result
//! always corresponds to index `i` of the request. The wallet protocol uses
//! camelCase field names on the wire (`authAddr`, `txID`, `signingAddress`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One transaction inside a wallet signing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// Base64-encoded canonical transaction bytes
    pub txn: String,
    /// Addresses expected to sign this entry. `None` means "the active
    /// address signs"; an empty list means "do not sign here" (the entry is
    /// authorized elsewhere).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signers: Option<Vec<String>>,
    /// Authorized signer when it differs from the sender
    #[serde(rename = "authAddr", skip_serializing_if = "Option::is_none")]
    pub auth_addr: Option<String>,
    /// Human-readable purpose shown by the wallet
    pub message: String,
}

/// A signature produced by the wallet for one request entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Transaction identifier assigned at signing time
    #[serde(rename = "txID")]
    pub tx_id: String,
    /// Address that produced the signature, when reported
    #[serde(rename = "signingAddress", skip_serializing_if = "Option::is_none")]
    pub signing_address: Option<String>,
    /// The signature itself, base64
    pub signature: String,
}

/// Outcome for one entry of a signing request.
///
/// The wallet may deliberately leave an entry unsigned (wire `null`), e.g.
/// a vendor-authored leg that is pre-authorized server-side. That is a
/// distinct, legitimate outcome rather than an absent value, so it gets its
/// own variant instead of an `Option`.
#[derive(Debug, Clone, PartialEq)]
pub enum SignatureOutcome {
    Signed(SignatureRecord),
    Unsigned,
}

impl SignatureOutcome {
    pub fn is_signed(&self) -> bool {
        matches!(self, SignatureOutcome::Signed(_))
    }

    /// The signature record, if this entry was signed.
    pub fn record(&self) -> Option<&SignatureRecord> {
        match self {
            SignatureOutcome::Signed(record) => Some(record),
            SignatureOutcome::Unsigned => None,
        }
    }
}

impl Serialize for SignatureOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SignatureOutcome::Signed(record) => record.serialize(serializer),
            SignatureOutcome::Unsigned => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for SignatureOutcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<SignatureRecord>::deserialize(deserializer)? {
            Some(record) => SignatureOutcome::Signed(record),
            None => SignatureOutcome::Unsigned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_null_round_trip() {
        let wire = r#"[{"txID":"T1","signature":"sig1"},null]"#;

        let outcomes: Vec<SignatureOutcome> = serde_json::from_str(wire).unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_signed());
        assert_eq!(outcomes[0].record().unwrap().tx_id, "T1");
        assert_eq!(outcomes[1], SignatureOutcome::Unsigned);

        let back = serde_json::to_string(&outcomes).unwrap();
        assert_eq!(back, wire);
    }

    #[test]
    fn test_wallet_transaction_omits_absent_fields() {
        let entry = WalletTransaction {
            txn: "AAAA".to_string(),
            signers: None,
            auth_addr: None,
            message: "Send 20 Sprout".to_string(),
        };

        let json = serde_json::to_value(&entry).unwrap();

        assert!(json.get("signers").is_none());
        assert!(json.get("authAddr").is_none());
        assert_eq!(json["message"], "Send 20 Sprout");
    }

    #[test]
    fn test_empty_signers_survive_serialization() {
        let entry = WalletTransaction {
            txn: "AAAA".to_string(),
            signers: Some(Vec::new()),
            auth_addr: None,
            message: "Receive 5 Seed".to_string(),
        };

        let json = serde_json::to_value(&entry).unwrap();

        // An empty list is meaningful ("do not sign here") and must not be dropped
        assert_eq!(json["signers"], serde_json::json!([]));
    }
}
