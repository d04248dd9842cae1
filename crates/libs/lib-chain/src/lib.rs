//! # Chain Library
//!
//! Read-only chain queries and asset-transfer transaction construction.
//!
//! ## Structure
//!
//! - **[`client`]**: [`ChainClient`], a thin facade over the node's read
//!   endpoints (suggested parameters, account holdings), behind the
//!   [`ChainQueries`] seam so callers can be tested against mocks
//! - **[`transaction`]**: canonical [`UnsignedTxn`] representation, wire
//!   encoding, and atomic group-id assignment
//! - **[`builder`]**: [`TransactionBuilder`] for single transfers, opt-in
//!   transfers, and grouped purchase pairs from sale terms and intent

pub mod builder;
pub mod client;
pub mod transaction;
pub mod types;

// Re-export commonly used types
pub use builder::{BuildError, PurchaseIntent, TransactionBuilder, TransactionPair};
pub use client::{ChainClient, ChainEndpoints, ChainError, ChainQueries};
pub use transaction::{assign_group_id, EncodeError, GroupId, UnsignedTxn};
pub use types::{AssetHolding, TxnParams};
