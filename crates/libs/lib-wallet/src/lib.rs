//! # Wallet Library
//!
//! The wallet session boundary: session lifecycle management and the
//! transaction signing round trip.
//!
//! ## Structure
//!
//! - **[`transport`]**: [`SessionTransport`], the narrow contract to the
//!   wallet session protocol (handshake, signed requests, events,
//!   teardown). The rest of the crate depends only on this trait, never on
//!   a concrete bridge implementation.
//! - **[`session`]**: [`SessionManager`], which owns the session state machine
//!   (`Disconnected → Connecting → Connected`), applies protocol events,
//!   and broadcasts [`SessionEvent`]s to subscribers.
//! - **[`signing`]**: [`SigningProtocol`], which encodes a transaction pair
//!   into the wallet signing wire format, dispatches it over the active
//!   session, and decodes the positional result.

pub mod session;
pub mod signing;
pub mod transport;

// Re-export commonly used types
pub use session::{Session, SessionEvent, SessionManager, SessionStatus};
pub use signing::{SigningError, SigningMessages, SigningProtocol, SigningResult};
pub use transport::{SessionHandle, SessionTransport, TransportError, TransportEvent};
