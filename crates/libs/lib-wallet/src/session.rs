//! # Session Manager
//!
//! Owns the wallet session lifecycle: connect, resume, event application,
//! teardown. The session state machine is
//! `Disconnected → Connecting → Connected → Disconnected`, with account-set
//! updates observable inside `Connected`.
//!
//! The manager is the only writer of session state; every other component
//! reads snapshots. Protocol events arrive asynchronously and may be
//! redelivered; application is idempotent for identical account lists.
//! Any fatal protocol error (empty account list, closed event channel)
//! forces a full reset, never a partial one.

use std::sync::Arc;

use lib_core::AppError;
use tokio::sync::{broadcast, mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::transport::{SessionTransport, TransportEvent};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Wallet session state.
///
/// Invariant: `connected` implies `accounts` is non-empty, and
/// `accounts[0]` is the active signing address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub connection_uri: String,
    pub connected: bool,
    pub accounts: Vec<String>,
    /// Advisory flag: a signing request is in flight over this session
    pub pending_request: bool,
}

/// Notifications for session-dependent components.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Session established with its initial account list
    Connected { accounts: Vec<String> },
    /// Account list changed while connected; dependents must drop
    /// everything keyed to the previous active address
    AccountsChanged { accounts: Vec<String> },
    /// Session gone; all dependent state is void
    Disconnected,
}

#[derive(Debug, Default)]
struct SessionState {
    status: SessionStatus,
    session: Session,
}

/// Wallet session lifecycle owner.
///
/// Instantiate once per application lifetime and pass down to
/// collaborators; subscriptions replace ambient global callbacks, so
/// nothing leaks across reconnects.
pub struct SessionManager {
    transport: Arc<dyn SessionTransport>,
    state: Arc<RwLock<SessionState>>,
    events: broadcast::Sender<SessionEvent>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn SessionTransport>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            transport,
            state: Arc::new(RwLock::new(SessionState::default())),
            events,
            pump: Mutex::new(None),
        }
    }

    /// Initiate a wallet session.
    ///
    /// Reuses the persisted session when the bridge still holds one (the
    /// handle then carries accounts and the state machine moves straight to
    /// `Connected`); otherwise a fresh handshake starts and accounts arrive
    /// later through the event stream.
    #[instrument(skip(self))]
    pub async fn connect(&self) -> Result<(), AppError> {
        {
            let mut state = self.state.write().await;
            if state.status != SessionStatus::Disconnected {
                debug!("connect ignored, session already {:?}", state.status);
                return Ok(());
            }
            state.status = SessionStatus::Connecting;
        }

        let (handle, transport_events) = match self.transport.ensure_session().await {
            Ok(established) => established,
            Err(err) => {
                warn!("session handshake failed: {}", err);
                Self::reset(&self.state, &self.events).await;
                return Err(err.into());
            }
        };

        info!("session bound to {}", handle.connection_uri);
        {
            let mut state = self.state.write().await;
            state.session.connection_uri = handle.connection_uri;
        }

        if !handle.accounts.is_empty() {
            Self::apply_accounts(&self.state, &self.events, handle.accounts).await;
        }

        let pump = tokio::spawn(Self::pump_events(
            Arc::clone(&self.state),
            self.events.clone(),
            transport_events,
        ));
        *self.pump.lock().await = Some(pump);

        Ok(())
    }

    /// Tear the session down and clear all dependent state.
    #[instrument(skip(self))]
    pub async fn disconnect(&self) {
        if let Some(pump) = self.pump.lock().await.take() {
            pump.abort();
        }
        if let Err(err) = self.transport.kill_session().await {
            warn!("session teardown reported: {}", err);
        }
        Self::reset(&self.state, &self.events).await;
    }

    /// Subscribe to session events. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.read().await.status
    }

    /// Snapshot of the current session state.
    pub async fn session(&self) -> Session {
        self.state.read().await.session.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.state.read().await.status == SessionStatus::Connected
    }

    /// The active signing address: always `accounts[0]` of the most recent
    /// event. Never cache this across an account change.
    pub async fn active_address(&self) -> Option<String> {
        self.state.read().await.session.accounts.first().cloned()
    }

    pub(crate) fn transport(&self) -> Arc<dyn SessionTransport> {
        Arc::clone(&self.transport)
    }

    /// Raise the pending-request flag. Returns false when no session is
    /// connected, in which case nothing was raised.
    pub(crate) async fn begin_request(&self) -> bool {
        let mut state = self.state.write().await;
        if state.status != SessionStatus::Connected {
            return false;
        }
        state.session.pending_request = true;
        true
    }

    pub(crate) async fn end_request(&self) {
        self.state.write().await.session.pending_request = false;
    }

    async fn pump_events(
        state: Arc<RwLock<SessionState>>,
        events: broadcast::Sender<SessionEvent>,
        mut transport_events: mpsc::Receiver<TransportEvent>,
    ) {
        while let Some(event) = transport_events.recv().await {
            match event {
                TransportEvent::Connect { accounts }
                | TransportEvent::SessionUpdate { accounts } => {
                    if accounts.is_empty() {
                        // A connected session without accounts violates the
                        // protocol invariant; treat as fatal.
                        error!("session event carried no accounts, forcing disconnect");
                        Self::reset(&state, &events).await;
                        return;
                    }
                    Self::apply_accounts(&state, &events, accounts).await;
                }
                TransportEvent::Disconnect => {
                    info!("wallet session disconnected by peer");
                    Self::reset(&state, &events).await;
                    return;
                }
            }
        }
        warn!("session event channel closed, forcing disconnect");
        Self::reset(&state, &events).await;
    }

    async fn apply_accounts(
        state: &RwLock<SessionState>,
        events: &broadcast::Sender<SessionEvent>,
        accounts: Vec<String>,
    ) {
        let event = {
            let mut state = state.write().await;
            // Events may be redelivered; an identical list is a no-op.
            if state.status == SessionStatus::Connected && state.session.accounts == accounts {
                return;
            }
            let newly_connected = state.status != SessionStatus::Connected;
            state.status = SessionStatus::Connected;
            state.session.connected = true;
            state.session.accounts = accounts.clone();
            if newly_connected {
                SessionEvent::Connected { accounts }
            } else {
                SessionEvent::AccountsChanged { accounts }
            }
        };
        // No subscribers is fine
        let _ = events.send(event);
    }

    async fn reset(state: &RwLock<SessionState>, events: &broadcast::Sender<SessionEvent>) {
        {
            let mut state = state.write().await;
            if state.status == SessionStatus::Disconnected
                && state.session == Session::default()
            {
                return;
            }
            // Full reset, never partial: no stale accounts, URI, or pending flag
            state.status = SessionStatus::Disconnected;
            state.session = Session::default();
        }
        let _ = events.send(SessionEvent::Disconnected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use crate::transport::{SessionHandle, TransportError};

    struct MockTransport {
        resume_accounts: Vec<String>,
        events: std::sync::Mutex<Option<mpsc::Receiver<TransportEvent>>>,
        killed: AtomicBool,
    }

    impl MockTransport {
        /// Returns the transport plus the sender driving its event stream.
        fn new(resume_accounts: Vec<String>) -> (Arc<Self>, mpsc::Sender<TransportEvent>) {
            let (tx, rx) = mpsc::channel(8);
            let transport = Arc::new(Self {
                resume_accounts,
                events: std::sync::Mutex::new(Some(rx)),
                killed: AtomicBool::new(false),
            });
            (transport, tx)
        }
    }

    #[async_trait]
    impl SessionTransport for MockTransport {
        async fn ensure_session(
            &self,
        ) -> Result<(SessionHandle, mpsc::Receiver<TransportEvent>), TransportError> {
            let events = self.events.lock().unwrap().take();
            match events {
                Some(events) => Ok((
                    SessionHandle {
                        connection_uri: "wc:mock-bridge".to_string(),
                        accounts: self.resume_accounts.clone(),
                    },
                    events,
                )),
                None => Err(TransportError::Connection("bridge unavailable".to_string())),
            }
        }

        async fn request(&self, _method: &str, _params: Value) -> Result<Value, TransportError> {
            Err(TransportError::Protocol("not scripted".to_string()))
        }

        async fn kill_session(&self) -> Result<(), TransportError> {
            self.killed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test]
    async fn test_resumed_session_is_connected_immediately() {
        let (transport, _events) = MockTransport::new(vec!["A".to_string(), "B".to_string()]);
        let manager = SessionManager::new(transport);

        manager.connect().await.unwrap();

        assert_eq!(manager.status().await, SessionStatus::Connected);
        assert_eq!(manager.active_address().await.as_deref(), Some("A"));
        let session = manager.session().await;
        assert!(session.connected);
        assert_eq!(session.connection_uri, "wc:mock-bridge");
    }

    #[tokio::test]
    async fn test_fresh_handshake_connects_on_event() {
        let (transport, events) = MockTransport::new(Vec::new());
        let manager = SessionManager::new(transport);

        manager.connect().await.unwrap();
        assert_eq!(manager.status().await, SessionStatus::Connecting);

        events
            .send(TransportEvent::Connect {
                accounts: vec!["A".to_string()],
            })
            .await
            .unwrap();
        settle().await;

        assert_eq!(manager.status().await, SessionStatus::Connected);
        assert_eq!(manager.active_address().await.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_account_change_moves_active_address() {
        let (transport, events) = MockTransport::new(Vec::new());
        let manager = SessionManager::new(transport);
        let mut subscription = manager.subscribe();

        manager.connect().await.unwrap();
        events
            .send(TransportEvent::Connect {
                accounts: vec!["A".to_string(), "B".to_string()],
            })
            .await
            .unwrap();
        events
            .send(TransportEvent::SessionUpdate {
                accounts: vec!["B".to_string(), "A".to_string()],
            })
            .await
            .unwrap();
        settle().await;

        // Active address followed the most recent event
        assert_eq!(manager.active_address().await.as_deref(), Some("B"));

        // Dependents saw both transitions, in order
        assert_eq!(
            subscription.try_recv().unwrap(),
            SessionEvent::Connected {
                accounts: vec!["A".to_string(), "B".to_string()]
            }
        );
        assert_eq!(
            subscription.try_recv().unwrap(),
            SessionEvent::AccountsChanged {
                accounts: vec!["B".to_string(), "A".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn test_identical_account_list_is_idempotent() {
        let (transport, events) = MockTransport::new(vec!["A".to_string()]);
        let manager = SessionManager::new(transport);

        manager.connect().await.unwrap();
        let mut subscription = manager.subscribe();

        events
            .send(TransportEvent::SessionUpdate {
                accounts: vec!["A".to_string()],
            })
            .await
            .unwrap();
        settle().await;

        assert!(subscription.try_recv().is_err());
        assert_eq!(manager.active_address().await.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_peer_disconnect_resets_everything() {
        let (transport, events) = MockTransport::new(vec!["A".to_string()]);
        let manager = SessionManager::new(transport);
        manager.connect().await.unwrap();

        events.send(TransportEvent::Disconnect).await.unwrap();
        settle().await;

        assert_eq!(manager.status().await, SessionStatus::Disconnected);
        assert_eq!(manager.session().await, Session::default());
        assert_eq!(manager.active_address().await, None);
    }

    #[tokio::test]
    async fn test_empty_account_event_is_fatal() {
        let (transport, events) = MockTransport::new(vec!["A".to_string()]);
        let manager = SessionManager::new(transport);
        manager.connect().await.unwrap();

        events
            .send(TransportEvent::SessionUpdate {
                accounts: Vec::new(),
            })
            .await
            .unwrap();
        settle().await;

        assert_eq!(manager.status().await, SessionStatus::Disconnected);
        assert_eq!(manager.session().await, Session::default());
    }

    #[tokio::test]
    async fn test_explicit_disconnect_kills_session() {
        let (transport, _events) = MockTransport::new(vec!["A".to_string()]);
        let manager = SessionManager::new(Arc::clone(&transport) as Arc<dyn SessionTransport>);
        manager.connect().await.unwrap();

        manager.disconnect().await;

        assert!(transport.killed.load(Ordering::SeqCst));
        assert_eq!(manager.status().await, SessionStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_reconnect_after_disconnect() {
        let (transport, events) = MockTransport::new(Vec::new());
        let manager = SessionManager::new(transport);
        manager.connect().await.unwrap();

        events
            .send(TransportEvent::Connect {
                accounts: vec!["A".to_string()],
            })
            .await
            .unwrap();
        events.send(TransportEvent::Disconnect).await.unwrap();
        settle().await;
        assert_eq!(manager.status().await, SessionStatus::Disconnected);

        // The mock's event stream was consumed, so the reconnect handshake
        // fails; the state machine must land cleanly back in Disconnected.
        assert!(manager.connect().await.is_err());
        assert_eq!(manager.status().await, SessionStatus::Disconnected);
        assert_eq!(manager.session().await, Session::default());
    }
}
