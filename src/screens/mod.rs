//! Concrete screens built on the engine: each instantiates the search or
//! page driver with one backend operation.

pub mod reference;
pub mod transfers;
pub mod users;

use chrono::{DateTime, Utc};

use crate::services::state_cache::FilterValues;

/// Read a non-empty string filter control.
pub(crate) fn str_filter(filters: &FilterValues, name: &str) -> Option<String> {
    filters
        .get(name)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Read an RFC 3339 date filter control.
pub(crate) fn date_filter(filters: &FilterValues, name: &str) -> Option<DateTime<Utc>> {
    str_filter(filters, name)
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|d| d.with_timezone(&Utc))
}
