//! Time and timestamp helpers.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::error::ValidationError;

/// UTC timestamp used for `created_at` and device capture times.
pub type Timestamp = DateTime<Utc>;

/// Sub-second digits kept on stored timestamps.
const STORED_SUBSEC_DIGITS: u16 = 6;

/// Return the current UTC time, at stored precision.
#[must_use]
pub fn now() -> Timestamp {
    to_stored_precision(Utc::now())
}

/// Drop sub-microsecond digits so a timestamp survives a storage round-trip.
#[must_use]
pub fn to_stored_precision(ts: Timestamp) -> Timestamp {
    ts.trunc_subsecs(STORED_SUBSEC_DIGITS)
}

/// Parse an RFC 3339 string into a UTC [`Timestamp`].
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTimestamp`] when `value` is not RFC 3339.
pub fn parse_rfc3339(value: &str) -> Result<Timestamp, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_utc())
        .map_err(|_| ValidationError::InvalidTimestamp(value.to_owned()))
}

/// Format a timestamp with fixed microsecond precision.
///
/// Fixed width keeps lexicographic order equal to chronological order.
#[must_use]
pub fn to_sortable_string(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
