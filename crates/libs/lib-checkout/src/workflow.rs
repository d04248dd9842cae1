//! # Purchase Workflow
//!
//! Orchestrates one purchase: load sale terms once, track the customer's
//! intent, then on submit run build → sign → submit strictly in sequence
//! over the active wallet session.
//!
//! One purchase per session at a time: the tagged phase doubles as the
//! in-flight guard, which is sufficient under cooperative scheduling. A
//! session disconnect during signing resolves the attempt as failed; the
//! workflow never hangs on a dead session.

use std::sync::Arc;

use lib_chain::builder::{PurchaseIntent, TransactionBuilder};
use lib_chain::client::ChainQueries;
use lib_chain::transaction::GroupId;
use lib_core::AppError;
use lib_utils::time::{format_time, now_utc, unix_to_utc};
use lib_wallet::session::SessionManager;
use lib_wallet::signing::{SigningMessages, SigningProtocol};
use shared::dto::sale::{SalePhase, SaleTerms};
use shared::dto::settlement::SettlementRequest;
use shared::dto::signing::SignatureRecord;
use shared::utils::truncate_address;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::settlement::SettlementSink;
use crate::terms::SaleTermsSource;

/// Where a purchase attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PurchasePhase {
    #[default]
    Idle,
    Building,
    Signing,
    Submitting,
    Done,
    Failed,
}

impl PurchasePhase {
    /// An attempt is running; no second submit may start.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            PurchasePhase::Building | PurchasePhase::Signing | PurchasePhase::Submitting
        )
    }
}

/// Sale descriptor load state, rendered by the UI shell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SaleTermsState {
    #[default]
    NotLoaded,
    Loaded(SaleTerms),
    /// Load failed; carries the alert text
    Failed(String),
}

/// Result of a completed purchase attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseOutcome {
    /// Group id both legs settle under
    pub group_id: GroupId,
    /// The customer's signature over leg 0
    pub signed: SignatureRecord,
    /// Whether the settlement backend accepted delivery. Delivery failure
    /// is logged, not fatal; the backend owns retrying its side.
    pub settlement_submitted: bool,
}

#[derive(Default)]
struct WorkflowState {
    terms: SaleTermsState,
    intent: PurchaseIntent,
    phase: PurchasePhase,
}

/// Single-purchase-at-a-time orchestrator.
pub struct PurchaseWorkflow {
    session: Arc<SessionManager>,
    builder: TransactionBuilder,
    signing: SigningProtocol,
    terms_source: Arc<dyn SaleTermsSource>,
    settlement: Arc<dyn SettlementSink>,
    state: RwLock<WorkflowState>,
}

impl PurchaseWorkflow {
    pub fn new(
        session: Arc<SessionManager>,
        chain: Arc<dyn ChainQueries>,
        terms_source: Arc<dyn SaleTermsSource>,
        settlement: Arc<dyn SettlementSink>,
    ) -> Self {
        Self {
            builder: TransactionBuilder::new(chain),
            signing: SigningProtocol::new(Arc::clone(&session)),
            session,
            terms_source,
            settlement,
            state: RwLock::new(WorkflowState::default()),
        }
    }

    /// Load the sale descriptor: one fetch at mount, no polling.
    ///
    /// A failure is remembered as the failed state and returned for a
    /// blocking alert; the workflow itself stays alive.
    #[instrument(skip(self))]
    pub async fn load_sale_terms(&self) -> Result<SaleTerms, AppError> {
        if let SaleTermsState::Loaded(terms) = &self.state.read().await.terms {
            return Ok(terms.clone());
        }

        match self.terms_source.fetch().await {
            Ok(terms) => {
                info!(
                    "sale terms loaded: {} sold for {}",
                    terms.sale_token.display_name, terms.accept_token.display_name
                );
                if let (Ok(start), Ok(end)) =
                    (unix_to_utc(terms.sale_start), unix_to_utc(terms.sale_end))
                {
                    info!("sale window {} to {}", format_time(start), format_time(end));
                }
                self.state.write().await.terms = SaleTermsState::Loaded(terms.clone());
                Ok(terms)
            }
            Err(err) => {
                error!("sale terms load failed: {}", err);
                self.state.write().await.terms = SaleTermsState::Failed(err.user_message());
                Err(err)
            }
        }
    }

    /// Recompute the intent from a new accept amount.
    ///
    /// The derived sale amount is never settable on its own; it always
    /// follows the sale's unit ratio. A no-op until terms are loaded.
    pub async fn set_accept_amount(&self, accept_amount: f64) {
        let mut state = self.state.write().await;
        let SaleTermsState::Loaded(terms) = &state.terms else {
            return;
        };
        state.intent = PurchaseIntent::from_accept_amount(accept_amount, terms.accept_unit_ratio);
    }

    pub async fn intent(&self) -> PurchaseIntent {
        self.state.read().await.intent
    }

    pub async fn phase(&self) -> PurchasePhase {
        self.state.read().await.phase
    }

    pub async fn terms_state(&self) -> SaleTermsState {
        self.state.read().await.terms.clone()
    }

    /// Sale phase right now, once terms are loaded.
    pub async fn sale_phase(&self) -> Option<SalePhase> {
        match &self.state.read().await.terms {
            SaleTermsState::Loaded(terms) => Some(terms.phase_at(now_utc())),
            _ => None,
        }
    }

    /// Run one purchase attempt: build → sign → submit, strictly in order.
    ///
    /// Requires a Connected session and loaded sale terms. Rejects a second
    /// submit while one is pending.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<PurchaseOutcome, AppError> {
        let connected = self.session.is_connected().await;
        let customer = self.session.active_address().await;

        // Claim the single in-flight slot under the preconditions
        let (terms, intent, customer) = {
            let mut state = self.state.write().await;
            if state.phase.is_in_flight() {
                return Err(AppError::SubmitInFlight);
            }
            if !connected {
                return Err(AppError::Precondition(
                    "wallet session not connected".to_string(),
                ));
            }
            let SaleTermsState::Loaded(terms) = &state.terms else {
                return Err(AppError::Precondition("sale terms not loaded".to_string()));
            };
            let terms = terms.clone();
            let Some(customer) = customer else {
                return Err(AppError::Precondition(
                    "wallet session exposes no account".to_string(),
                ));
            };
            state.phase = PurchasePhase::Building;
            (terms, state.intent, customer)
        };

        let attempt = Uuid::new_v4();
        info!(
            "purchase attempt {} started by {}",
            attempt,
            truncate_address(&customer)
        );

        let result = self.run_purchase(&terms, &intent, &customer).await;

        match &result {
            Ok(outcome) => {
                info!(
                    "purchase attempt {} completed under group {}",
                    attempt, outcome.group_id
                );
                self.set_phase(PurchasePhase::Done).await;
            }
            Err(err) => {
                warn!("purchase attempt {} failed: {}", attempt, err);
                self.set_phase(PurchasePhase::Failed).await;
            }
        }
        result
    }

    async fn run_purchase(
        &self,
        terms: &SaleTerms,
        intent: &PurchaseIntent,
        customer: &str,
    ) -> Result<PurchaseOutcome, AppError> {
        let pair = self.builder.purchase_pair(intent, terms, customer).await?;

        self.set_phase(PurchasePhase::Signing).await;
        let messages = SigningMessages {
            customer: format!(
                "Send {} {}",
                intent.accept_amount(),
                terms.accept_token.display_name
            ),
            vendor: format!(
                "Receive {} {}",
                intent.sale_amount(),
                terms.sale_token.display_name
            ),
        };
        let outcomes = self.signing.request_signatures(&pair, &messages).await?;

        // Leg 0 must come back signed; the vendor leg may legitimately be
        // unsigned (pre-authorized on the vendor's side).
        let signed = outcomes
            .first()
            .and_then(|outcome| outcome.record())
            .cloned()
            .ok_or_else(|| AppError::Malformed("customer leg came back unsigned".to_string()))?;

        self.set_phase(PurchasePhase::Submitting).await;
        let request = SettlementRequest {
            signed_transaction: signed.clone(),
            unsigned_transaction: pair
                .vendor_to_customer
                .encode_b64()
                .map_err(|e| AppError::Internal(e.to_string()))?,
        };
        let settlement_submitted = match self.settlement.submit(&request).await {
            Ok(()) => true,
            Err(err) => {
                // Fire-and-forget: log and record, never fail the purchase
                error!("settlement submission failed: {}", err);
                false
            }
        };

        Ok(PurchaseOutcome {
            group_id: pair.group_id,
            signed,
            settlement_submitted,
        })
    }

    async fn set_phase(&self, phase: PurchasePhase) {
        self.state.write().await.phase = phase;
    }
}
