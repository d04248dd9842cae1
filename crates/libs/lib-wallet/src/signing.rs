//! # Signing Protocol
//!
//! Encodes a purchase transaction pair into the wallet signing wire format,
//! dispatches it as one atomic request over the active session, and decodes
//! the positional result.
//!
//! Order is significant end to end: index 0 is the customer-authored leg,
//! index 1 the vendor-authored leg, and the wallet answers positionally. A
//! `null` answer at an index is a legitimate outcome (entry deliberately
//! left unsigned), not an error. Signature verification is the settlement
//! backend's job, not this module's.

use std::sync::Arc;

use lib_chain::builder::TransactionPair;
use lib_core::AppError;
use serde_json::Value;
use shared::dto::signing::{SignatureOutcome, WalletTransaction};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};

use crate::session::{SessionEvent, SessionManager};
use crate::transport::TransportError;

/// Method name of the wallet's signed-request call.
pub const SIGN_TXNS_METHOD: &str = "wallet_signTxns";

/// Ordered outcome of a signing round trip, one entry per request entry.
pub type SigningResult = Vec<SignatureOutcome>;

/// Human-readable purpose lines shown by the wallet, one per leg.
#[derive(Debug, Clone)]
pub struct SigningMessages {
    pub customer: String,
    pub vendor: String,
}

/// Signing round-trip errors
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("no active wallet session")]
    SessionNotConnected,

    #[error("signing request rejected: {0}")]
    Rejected(String),

    #[error("session transport failed: {0}")]
    Transport(String),

    #[error("malformed signing response: {0}")]
    Malformed(String),

    #[error("failed to encode signing request: {0}")]
    Encoding(String),
}

impl From<SigningError> for AppError {
    fn from(err: SigningError) -> Self {
        match err {
            SigningError::SessionNotConnected => AppError::SessionNotConnected,
            SigningError::Rejected(reason) => AppError::Rejected(reason),
            SigningError::Transport(msg) => AppError::Transport(msg),
            SigningError::Malformed(msg) => AppError::Malformed(msg),
            SigningError::Encoding(msg) => AppError::Internal(msg),
        }
    }
}

/// Wallet signing round trip over an active session.
pub struct SigningProtocol {
    manager: Arc<SessionManager>,
}

impl SigningProtocol {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }

    /// Package the pair in wallet wire form, preserving order.
    ///
    /// The customer leg carries no signer set (the active address signs).
    /// The vendor leg carries an empty signer set: the wallet must display
    /// it but not sign; it is authorized on the vendor's side.
    pub fn build_request(
        pair: &TransactionPair,
        messages: &SigningMessages,
    ) -> Result<Vec<WalletTransaction>, SigningError> {
        let encode = |txn: &lib_chain::UnsignedTxn| {
            txn.encode_b64()
                .map_err(|e| SigningError::Encoding(e.to_string()))
        };

        Ok(vec![
            WalletTransaction {
                txn: encode(&pair.customer_to_vendor)?,
                signers: None,
                auth_addr: None,
                message: messages.customer.clone(),
            },
            WalletTransaction {
                txn: encode(&pair.vendor_to_customer)?,
                signers: Some(Vec::new()),
                auth_addr: None,
                message: messages.vendor.clone(),
            },
        ])
    }

    /// Request signatures for the pair over the active session.
    ///
    /// Exactly one response is awaited. A session disconnect while the
    /// request is pending resolves the call as failed instead of hanging,
    /// and the pending-request flag is cleared on every exit path.
    #[instrument(skip_all, fields(group = %pair.group_id))]
    pub async fn request_signatures(
        &self,
        pair: &TransactionPair,
        messages: &SigningMessages,
    ) -> Result<SigningResult, SigningError> {
        if !self.manager.begin_request().await {
            return Err(SigningError::SessionNotConnected);
        }

        let result = self.round_trip(pair, messages).await;
        self.manager.end_request().await;

        if let Err(err) = &result {
            warn!("signing round trip failed: {}", err);
        }
        result
    }

    async fn round_trip(
        &self,
        pair: &TransactionPair,
        messages: &SigningMessages,
    ) -> Result<SigningResult, SigningError> {
        let request = Self::build_request(pair, messages)?;
        let expected = request.len();
        let params = serde_json::json!([request]);

        let mut session_events = self.manager.subscribe();
        let transport = self.manager.transport();

        debug!("dispatching signing request with {} entries", expected);

        tokio::select! {
            response = transport.request(SIGN_TXNS_METHOD, params) => {
                let value = response.map_err(|err| match err {
                    TransportError::Rejected(reason) => SigningError::Rejected(reason),
                    other => SigningError::Transport(other.to_string()),
                })?;
                Self::decode_result(value, expected)
            }
            _ = wait_for_disconnect(&mut session_events) => {
                Err(SigningError::Transport(
                    "session disconnected while awaiting signatures".to_string(),
                ))
            }
        }
    }

    /// Decode the wallet's answer, enforcing arity and order.
    fn decode_result(value: Value, expected: usize) -> Result<SigningResult, SigningError> {
        let outcomes: SigningResult = serde_json::from_value(value)
            .map_err(|e| SigningError::Malformed(e.to_string()))?;

        if outcomes.len() != expected {
            return Err(SigningError::Malformed(format!(
                "expected {} entries, wallet answered {}",
                expected,
                outcomes.len()
            )));
        }
        Ok(outcomes)
    }
}

async fn wait_for_disconnect(events: &mut broadcast::Receiver<SessionEvent>) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::Disconnected) => return,
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Closed) => return,
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lib_chain::transaction::{assign_group_id, UnsignedTxn};
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::mpsc;

    use crate::transport::{SessionHandle, SessionTransport, TransportEvent};

    fn pair() -> TransactionPair {
        let transfer = |from: &str, to: &str, amount: u64, fee: u64| UnsignedTxn {
            sender: from.to_string(),
            receiver: to.to_string(),
            asset_index: 7,
            amount,
            fee,
            flat_fee: true,
            first_valid: 100,
            last_valid: 1_100,
            genesis_id: "testnet-v1.0".to_string(),
            group: None,
        };

        let mut legs = [
            transfer("CUSTOMER", "VENDOR", 20, 2_000),
            transfer("VENDOR", "CUSTOMER", 5, 0),
        ];
        let group_id = assign_group_id(&mut legs);
        let [customer_to_vendor, vendor_to_customer] = legs;
        TransactionPair {
            customer_to_vendor,
            vendor_to_customer,
            group_id,
        }
    }

    fn messages() -> SigningMessages {
        SigningMessages {
            customer: "Send 20 USD Coin".to_string(),
            vendor: "Receive 5 SproutCoin".to_string(),
        }
    }

    /// Transport with a scripted answer to the signing request.
    /// `None` means the request never resolves (wallet keeps the prompt up).
    struct ScriptedTransport {
        response: std::sync::Mutex<Option<Result<Value, TransportError>>>,
        events: std::sync::Mutex<Option<mpsc::Receiver<TransportEvent>>>,
    }

    impl ScriptedTransport {
        fn new(
            response: Option<Result<Value, TransportError>>,
        ) -> (Arc<Self>, mpsc::Sender<TransportEvent>) {
            let (tx, rx) = mpsc::channel(8);
            let transport = Arc::new(Self {
                response: std::sync::Mutex::new(response),
                events: std::sync::Mutex::new(Some(rx)),
            });
            (transport, tx)
        }
    }

    #[async_trait]
    impl SessionTransport for ScriptedTransport {
        async fn ensure_session(
            &self,
        ) -> Result<(SessionHandle, mpsc::Receiver<TransportEvent>), TransportError> {
            let events = self.events.lock().unwrap().take().unwrap();
            Ok((
                SessionHandle {
                    connection_uri: "wc:mock-bridge".to_string(),
                    accounts: vec!["CUSTOMER".to_string()],
                },
                events,
            ))
        }

        async fn request(&self, method: &str, _params: Value) -> Result<Value, TransportError> {
            assert_eq!(method, SIGN_TXNS_METHOD);
            let scripted = self.response.lock().unwrap().take();
            match scripted {
                Some(result) => result,
                None => std::future::pending().await,
            }
        }

        async fn kill_session(&self) -> Result<(), TransportError> {
            Ok(())
        }
    }

    async fn connected_protocol(
        response: Option<Result<Value, TransportError>>,
    ) -> (SigningProtocol, Arc<SessionManager>, mpsc::Sender<TransportEvent>) {
        let (transport, events) = ScriptedTransport::new(response);
        let manager = Arc::new(SessionManager::new(transport));
        manager.connect().await.unwrap();
        (SigningProtocol::new(Arc::clone(&manager)), manager, events)
    }

    #[test]
    fn test_build_request_preserves_order_and_signer_semantics() {
        let request = SigningProtocol::build_request(&pair(), &messages()).unwrap();

        assert_eq!(request.len(), 2);
        // Index 0: customer leg, active address signs
        assert_eq!(request[0].signers, None);
        assert_eq!(request[0].message, "Send 20 USD Coin");
        // Index 1: vendor leg, wallet must not sign
        assert_eq!(request[1].signers, Some(Vec::new()));
        assert_eq!(request[1].message, "Receive 5 SproutCoin");
    }

    #[tokio::test]
    async fn test_round_trip_preserves_length_and_order() {
        let response = json!([
            {"txID": "T1", "signingAddress": "CUSTOMER", "signature": "sig1"},
            null
        ]);
        let (protocol, manager, _events) = connected_protocol(Some(Ok(response))).await;

        let result = protocol
            .request_signatures(&pair(), &messages())
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        // An unsigned vendor leg does not invalidate the customer signature
        assert_eq!(result[0].record().unwrap().tx_id, "T1");
        assert_eq!(result[1], SignatureOutcome::Unsigned);
        assert!(!manager.session().await.pending_request);
    }

    #[tokio::test]
    async fn test_requires_active_session() {
        let (transport, _events) = ScriptedTransport::new(None);
        let manager = Arc::new(SessionManager::new(transport));
        // No connect: the manager is still Disconnected
        let protocol = SigningProtocol::new(Arc::clone(&manager));

        let err = protocol
            .request_signatures(&pair(), &messages())
            .await
            .unwrap_err();

        assert!(matches!(err, SigningError::SessionNotConnected));
    }

    #[tokio::test]
    async fn test_user_rejection_maps_to_rejected() {
        let response = Err(TransportError::Rejected("declined in wallet".to_string()));
        let (protocol, manager, _events) = connected_protocol(Some(response)).await;

        let err = protocol
            .request_signatures(&pair(), &messages())
            .await
            .unwrap_err();

        assert!(matches!(err, SigningError::Rejected(_)));
        assert!(!manager.session().await.pending_request);
    }

    #[tokio::test]
    async fn test_wrong_arity_is_malformed() {
        let response = json!([{"txID": "T1", "signature": "sig1"}]);
        let (protocol, _manager, _events) = connected_protocol(Some(Ok(response))).await;

        let err = protocol
            .request_signatures(&pair(), &messages())
            .await
            .unwrap_err();

        assert!(matches!(err, SigningError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_disconnect_during_pending_request_resolves() {
        // The wallet never answers; only the disconnect can end the call
        let (protocol, manager, events) = connected_protocol(None).await;

        let worker = {
            let pair = pair();
            let messages = messages();
            tokio::spawn(async move { protocol.request_signatures(&pair, &messages).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(manager.session().await.pending_request);

        events.send(TransportEvent::Disconnect).await.unwrap();

        let result = worker.await.unwrap();
        assert!(matches!(result, Err(SigningError::Transport(_))));
        // No hang, no stale pending flag
        assert!(!manager.session().await.pending_request);
    }
}
