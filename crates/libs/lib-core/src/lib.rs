//! # Core Library
//!
//! Configuration, logging setup, and the application-wide error type for
//! the checkout crates.

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{core_config, init_config, Config};
pub use error::{AppError, Result};
pub use logging::init_tracing;
