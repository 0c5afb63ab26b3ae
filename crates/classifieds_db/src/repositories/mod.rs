//! Repository modules for database access
//!
//! Profiles and ads each have a storage trait and a SQL implementation.

pub mod ad;
pub mod ad_sql;
pub mod factories;
pub mod profile;
pub mod profile_sql;

use crate::error::DbError;
use chrono::{DateTime, SecondsFormat, Utc};

pub use ad::{Ad, AdRepository, AdUpdate, NewAd};
pub use ad_sql::SqlAdRepository;
pub use factories::{AdRepositoryFactory, ProfileRepositoryFactory};
pub use profile::{ProfileRepository, UserProfile};
pub use profile_sql::SqlProfileRepository;

/// Timestamps are stored as fixed-width RFC 3339 text so they sort lexically.
pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DbError::DecodeError(format!("invalid timestamp '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_text_round_trips() {
        let now = Utc::now();
        assert_eq!(parse_timestamp(&format_timestamp(now)).unwrap(), now);
    }

    #[test]
    fn test_bad_timestamp_is_decode_error() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(DbError::DecodeError(_))
        ));
    }
}
