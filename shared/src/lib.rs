//! # Shared Data Transfer Objects Library
//!
//! This library defines the wire contracts between the checkout core and its
//! external collaborators: the sale-terms feed, the wallet signing protocol,
//! and the settlement backend.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for external communication
//!   - **[`dto::sale`]**: Sale descriptor feed schema and sale-window phases
//!   - **[`dto::signing`]**: Wallet signing request/result wire format
//!   - **[`dto::settlement`]**: Settlement backend request body
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_address`]**: Format wallet addresses for display
//!   - **[`utils::truncate_address`]**: Truncate addresses with ellipsis
//!
//! ## Wire Format
//!
//! All DTOs serialize to JSON via `serde`. Field names default to
//! **snake_case**; the signing and settlement types carry explicit
//! `#[serde(rename = "...")]` attributes where the external protocol uses
//! camelCase (e.g. `txID`, `signedTransaction`).

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
// Note: Wildcard re-exports are used here since shared is a DTO library
// where all exports are meant to be public API
pub use dto::*;
pub use utils::*;
