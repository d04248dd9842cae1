//! # Time Utilities
//!
//! Utilities for time handling using chrono. Sale windows come over the
//! wire as unix seconds.

use chrono::{DateTime, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format time as RFC3339 string.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339()
}

/// Convert unix seconds to UTC DateTime.
pub fn unix_to_utc(secs: i64) -> Result<DateTime<Utc>, Error> {
    DateTime::from_timestamp(secs, 0).ok_or(Error::OutOfRangeTimestamp(secs))
}


// region:    --- Error
#[derive(Debug)]
pub enum Error {
    OutOfRangeTimestamp(i64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
