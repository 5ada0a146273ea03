//! Timestamp value object for temporal data.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp with microsecond precision.
///
/// Precision is truncated on construction so that a value written to storage
/// and read back compares equal to the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a new Timestamp from a DateTime<Utc>.
    #[must_use]
    pub fn new(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(6))
    }

    /// Get the current timestamp.
    #[must_use]
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Parse from an ISO 8601 string.
    ///
    /// # Errors
    ///
    /// Returns error if the string is not a valid ISO 8601 timestamp.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        let dt = DateTime::parse_from_rfc3339(s)?;
        Ok(Self::new(dt.with_timezone(&Utc)))
    }

    /// Get the inner DateTime<Utc>.
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Fixed-width storage form, e.g. `2026-01-19T12:00:00.000000Z`.
    ///
    /// Lexical order of this form equals chronological order.
    #[must_use]
    pub fn to_storage(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_storage())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::new(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_parse_and_storage_form() {
        let ts = Timestamp::parse("2026-01-19T12:00:00Z").unwrap();
        assert_eq!(ts.to_storage(), "2026-01-19T12:00:00.000000Z");
    }

    #[test]
    fn timestamp_parse_invalid() {
        assert!(Timestamp::parse("not-a-date").is_err());
    }

    #[test]
    fn timestamp_storage_roundtrip_is_lossless() {
        let ts = Timestamp::now();
        let back = Timestamp::parse(&ts.to_storage()).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn timestamp_truncates_to_micros() {
        let ts = Timestamp::parse("2026-01-19T12:00:00.123456789Z").unwrap();
        assert_eq!(ts.to_storage(), "2026-01-19T12:00:00.123456Z");
    }

    #[test]
    fn storage_form_sorts_chronologically() {
        let earlier = Timestamp::parse("2026-01-19T09:59:59.999999Z").unwrap();
        let later = Timestamp::parse("2026-01-19T10:00:00Z").unwrap();
        assert!(earlier < later);
        assert!(earlier.to_storage() < later.to_storage());
    }

    #[test]
    fn timestamp_from_offset_normalizes_to_utc() {
        let ts = Timestamp::parse("2026-01-19T14:00:00+02:00").unwrap();
        assert_eq!(ts.to_storage(), "2026-01-19T12:00:00.000000Z");
    }
}
