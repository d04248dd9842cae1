//! # Session Transport
//!
//! The narrow contract to the wallet session protocol. The checkout core
//! depends only on this trait (handshake, one-shot signed requests, event
//! delivery, teardown), never on the protocol's internal transport.

use async_trait::async_trait;
use lib_core::AppError;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

/// A bridge-negotiated session handle.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionHandle {
    /// Connection URI identifying the session at the bridge
    pub connection_uri: String,
    /// Accounts already bound to a resumed session; empty when a fresh
    /// handshake was started and accounts will arrive via `Connect`
    pub accounts: Vec<String>,
}

/// Protocol events delivered asynchronously after the handshake begins.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Handshake completed; the wallet exposed its accounts
    Connect { accounts: Vec<String> },
    /// The account set changed on the wallet side
    SessionUpdate { accounts: Vec<String> },
    /// The peer tore the session down
    Disconnect,
}

/// Session transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    /// The wallet user declined the request
    #[error("request rejected by wallet: {0}")]
    Rejected(String),

    /// Communication with the bridge or wallet broke down
    #[error("session connection failed: {0}")]
    Connection(String),

    /// The peer violated the session protocol
    #[error("session protocol violation: {0}")]
    Protocol(String),
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Rejected(reason) => AppError::Rejected(reason),
            TransportError::Connection(msg) => AppError::Transport(msg),
            TransportError::Protocol(msg) => AppError::Malformed(msg),
        }
    }
}

/// Wallet session protocol boundary.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Reuse the persisted session when the bridge still holds one,
    /// otherwise begin a new handshake (rendered externally as a connection
    /// prompt). Protocol events flow through the returned receiver from
    /// this point on.
    async fn ensure_session(
        &self,
    ) -> Result<(SessionHandle, mpsc::Receiver<TransportEvent>), TransportError>;

    /// Send one named signed-request with JSON params and await exactly one
    /// response.
    async fn request(&self, method: &str, params: Value) -> Result<Value, TransportError>;

    /// Tear the session down at the bridge.
    async fn kill_session(&self) -> Result<(), TransportError>;
}
