//! Shared helpers for command handlers.

use chrono::{DateTime, NaiveDate, Utc};

use upway_core::Variable;

use crate::error::CliError;

/// Parse a symbolic variable name, case-insensitively.
pub fn parse_variable(name: &str) -> Result<Variable, CliError> {
    name.parse().map_err(|_| CliError::UnknownVariable { name: name.into() })
}

/// Parse a range bound: RFC 3339, or a bare date meaning midnight UTC.
pub fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>, CliError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| CliError::Validation {
            field: field.into(),
            reason: format!("expected RFC 3339 or YYYY-MM-DD, got '{raw}'"),
        })
}
