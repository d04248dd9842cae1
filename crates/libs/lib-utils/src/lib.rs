//! # Utilities Library
//!
//! Shared utility functions for base64 encoding, environment variables, time, and validation.

pub mod b64;
pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use b64::{b64_decode, b64_encode};
pub use envs::{get_env, get_env_or, get_env_parse};
pub use time::{format_time, now_utc, unix_to_utc};
pub use validation::{validate_http_url, validate_not_empty};
