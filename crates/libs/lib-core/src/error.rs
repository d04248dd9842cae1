//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] used by
//! the orchestration layer. It follows the `thiserror` pattern for ergonomic
//! error handling.
//!
//! ## Design Philosophy
//!
//! - **Single Error Type**: the orchestration surface returns `AppError`
//! - **Module Enums Below**: chain, build, and signing internals keep their
//!   own `thiserror` enums and convert upward via `From`
//! - **User Messages**: every variant maps to display text the UI shell can
//!   show as an alert or inline failure state
//!
//! ## Error Categories
//!
//! 1. **Startup**: [`Config`](AppError::Config)
//! 2. **Best-effort fetches**: [`Network`](AppError::Network) degrades to
//!    empty/alert, never crash the workflow
//! 3. **Blocked submits**: [`InvalidIntent`](AppError::InvalidIntent),
//!    [`SessionNotConnected`](AppError::SessionNotConnected),
//!    [`Precondition`](AppError::Precondition),
//!    [`SubmitInFlight`](AppError::SubmitInFlight)
//! 4. **Signing round trip**: [`Rejected`](AppError::Rejected),
//!    [`Transport`](AppError::Transport)
//! 5. **Protocol violations**: [`Malformed`](AppError::Malformed),
//!    structurally unexpected payloads propagate, they are never swallowed

use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type covering all checkout error scenarios.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport failure or non-2xx response from an external service
    /// (chain node, sale-terms feed, settlement backend).
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed purchase amount; blocks transaction construction.
    #[error("Invalid purchase intent: {0}")]
    InvalidIntent(String),

    /// An operation that needs an active wallet session found none.
    #[error("No active wallet session")]
    SessionNotConnected,

    /// Submit attempted without required state (sale terms, accounts).
    #[error("Precondition not met: {0}")]
    Precondition(String),

    /// A purchase is already in flight; one purchase per session at a time.
    #[error("A purchase is already in progress")]
    SubmitInFlight,

    /// The wallet user declined the signing request.
    #[error("Signing request rejected: {0}")]
    Rejected(String),

    /// Session communication breakdown during a request.
    #[error("Session transport error: {0}")]
    Transport(String),

    /// Structurally unexpected payload from a collaborator (session event,
    /// signing response, node document).
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// Internal failure (serialization, task plumbing).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get a user-friendly message for display by the UI shell.
    ///
    /// Internal details are hidden behind generic text; blocked-submit
    /// variants keep their context since the user can act on it.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidIntent(msg) => msg.clone(),
            AppError::Precondition(msg) => msg.clone(),
            AppError::SessionNotConnected => "Connect a wallet first".to_string(),
            AppError::SubmitInFlight => "A purchase is already in progress".to_string(),
            AppError::Rejected(_) => "The signing request was declined in the wallet".to_string(),
            AppError::Network(_) => "Service temporarily unavailable".to_string(),
            AppError::Transport(_) => "Lost contact with the wallet".to_string(),
            AppError::Config(_) | AppError::Malformed(_) | AppError::Internal(_) => {
                "An internal error occurred".to_string()
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_hide_internals() {
        let err = AppError::Transport("bridge socket reset by peer".to_string());
        assert!(!err.user_message().contains("socket"));

        let err = AppError::InvalidIntent("amount must be positive".to_string());
        assert_eq!(err.user_message(), "amount must be positive");
    }
}
