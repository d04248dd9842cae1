//! # Checkout Library
//!
//! Orchestration of the purchase flow: load the sale descriptor, track the
//! customer's intent, run build → sign → submit against an active wallet
//! session, and keep account holdings fresh as the session's account set
//! changes.
//!
//! ## Structure
//!
//! - **[`terms`]**: [`SaleTermsSource`] seam plus the HTTP feed client
//! - **[`settlement`]**: [`SettlementSink`] seam plus the HTTP backend client
//! - **[`holdings`]**: [`HoldingsTracker`], session-event-driven holdings
//!   refresh for the active address
//! - **[`workflow`]**: [`PurchaseWorkflow`], the single-purchase-at-a-time
//!   orchestrator
//!
//! The UI shell is an external collaborator: it renders the states exposed
//! here and feeds user intents (amount changes, submit clicks) back in.

pub mod holdings;
pub mod settlement;
pub mod terms;
pub mod workflow;

// Re-export commonly used types
pub use holdings::{AccountHoldings, HoldingsTracker};
pub use settlement::{HttpSettlementClient, SettlementSink};
pub use terms::{HttpSaleTermsClient, SaleTermsSource};
pub use workflow::{PurchaseOutcome, PurchasePhase, PurchaseWorkflow, SaleTermsState};
