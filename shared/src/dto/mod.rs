//! Data Transfer Objects for external communication.

pub mod sale;
pub mod settlement;
pub mod signing;

pub use sale::{AssetDescriptor, ChainId, SalePhase, SaleTerms};
pub use settlement::SettlementRequest;
pub use signing::{SignatureOutcome, SignatureRecord, WalletTransaction};
