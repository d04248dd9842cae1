//! # Holdings Tracker
//!
//! Keeps the active address's asset holdings fresh across session events.
//! An account change drops everything keyed to the previous address and
//! refetches for the new one; a disconnect clears the snapshot entirely.
//! Fetch failures degrade to an empty list so the UI keeps rendering.

use std::sync::Arc;

use lib_chain::client::ChainQueries;
use lib_chain::types::AssetHolding;
use lib_wallet::session::SessionEvent;
use shared::dto::sale::ChainId;
use shared::utils::truncate_address;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

/// Holdings snapshot for one address.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountHoldings {
    pub address: String,
    pub assets: Vec<AssetHolding>,
}

/// Session-event-driven holdings tracker for the active address.
pub struct HoldingsTracker {
    chain: Arc<dyn ChainQueries>,
    chain_id: RwLock<ChainId>,
    state: RwLock<Option<AccountHoldings>>,
}

impl HoldingsTracker {
    pub fn new(chain: Arc<dyn ChainQueries>, chain_id: ChainId) -> Self {
        Self {
            chain,
            chain_id: RwLock::new(chain_id),
            state: RwLock::new(None),
        }
    }

    /// Current snapshot, if any address is active.
    pub async fn holdings(&self) -> Option<AccountHoldings> {
        self.state.read().await.clone()
    }

    pub async fn chain(&self) -> ChainId {
        *self.chain_id.read().await
    }

    /// Switch network and refetch for the current address.
    pub async fn set_chain(&self, chain_id: ChainId) {
        *self.chain_id.write().await = chain_id;
        let address = self.state.read().await.as_ref().map(|h| h.address.clone());
        if let Some(address) = address {
            self.refresh(&address).await;
        }
    }

    /// Apply one session event.
    pub async fn apply_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::Connected { accounts } | SessionEvent::AccountsChanged { accounts } => {
                if let Some(active) = accounts.first() {
                    self.refresh(active).await;
                }
            }
            SessionEvent::Disconnected => {
                *self.state.write().await = None;
            }
        }
    }

    /// Refetch holdings for the given address, replacing any previous
    /// snapshot. A failed fetch yields an empty list, never a crash.
    #[instrument(skip(self), fields(address = %truncate_address(address)))]
    pub async fn refresh(&self, address: &str) {
        let chain_id = *self.chain_id.read().await;
        let assets = match self.chain.account_assets(chain_id, address).await {
            Ok(assets) => assets,
            Err(err) => {
                warn!("holdings fetch failed: {}", err);
                Vec::new()
            }
        };
        debug!("holdings refreshed: {} assets", assets.len());
        *self.state.write().await = Some(AccountHoldings {
            address: address.to_string(),
            assets,
        });
    }

    /// Drive the tracker from a session event subscription.
    pub fn spawn(self: Arc<Self>, mut events: broadcast::Receiver<SessionEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => self.apply_event(&event).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("holdings tracker lagged {} session events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
