// ── Value parsing ──
//
// Pure functions turning raw service fields into unified values. The
// portal encodes magnitude and unit in one string; the API sends typed
// numbers plus an optional enum table.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Number;

use upway_api::myuplink::types::EnumValue;

use crate::error::CoreError;
use crate::model::Value;

/// Sign, digits, optional `.`/`,` fraction, then anything but digits.
static NUMBER_WITH_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+(?:[.,]\d+)?)(\D*)$").expect("number/unit pattern is valid")
});

/// Envelope date formats seen from the portal, in the order they are tried.
pub const ENVELOPE_DATE_FORMATS: [&str; 6] = [
    "%m/%d/%Y %H:%M:%S",
    "%Y. %m. %d. %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H.%M.%S",
];

// ── Portal ──────────────────────────────────────────────────────────

/// Split a portal value like `"21.5°C"` into `("21.5", Some("°C"))`.
///
/// The number is kept as text, separator included. Values that do not
/// start with a number (`"On"`, `"Off"`) come back whole with no unit.
pub fn parse_text_value(raw: &str) -> (String, Option<String>) {
    match NUMBER_WITH_UNIT.captures(raw) {
        Some(caps) => {
            let number = caps.get(1).map_or("", |m| m.as_str());
            let unit = caps.get(2).and_then(|m| normalize_unit(m.as_str()));
            (number.to_owned(), unit)
        }
        None => (raw.to_owned(), None),
    }
}

/// Parse the portal's envelope `Date`, trying each known format in order.
pub fn parse_envelope_date(raw: &str) -> Result<NaiveDateTime, CoreError> {
    let raw = raw.trim();
    ENVELOPE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| CoreError::response(format!("unrecognized envelope date {raw:?}")))
}

/// Timestamp of a history point (milliseconds since the epoch).
pub fn history_timestamp(millis: i64) -> Result<DateTime<Utc>, CoreError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| CoreError::response(format!("history timestamp {millis} out of range")))
}

/// Value of a history point; charts carry numbers, occasionally `null`.
pub fn history_value(raw: serde_json::Value) -> Option<Value> {
    match raw {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(Value::Bool(b)),
        serde_json::Value::Number(n) => Some(number_value(&n).0),
        serde_json::Value::String(s) => Some(Value::Text(s)),
        other => Some(Value::Text(other.to_string())),
    }
}

// ── API ─────────────────────────────────────────────────────────────

/// Resolve an API point value against its enum table.
///
/// The value is returned unchanged. The enum label is the text of the
/// first entry whose value matches the number (whole floats compare in
/// integer form, so `2.0` matches `"2"`), falling back to the number's
/// own string form.
pub fn parse_point_value(
    value: Option<&Number>,
    enum_values: &[EnumValue],
) -> (Option<Value>, Option<String>) {
    let Some(number) = value else {
        return (None, None);
    };

    let (value, key) = number_value(number);
    let label = enum_values
        .iter()
        .find(|entry| enum_key(&entry.value) == key)
        .and_then(|entry| entry.text.clone())
        .unwrap_or_else(|| key.clone());

    (Some(value), Some(label))
}

/// Typed value of a JSON number plus its lookup key.
fn number_value(number: &Number) -> (Value, String) {
    if let Some(i) = number.as_i64() {
        return (Value::Integer(i), i.to_string());
    }
    let f = number.as_f64().unwrap_or(f64::NAN);
    (Value::Float(f), float_key(f))
}

/// String form used for enum lookup: whole numbers drop their fraction.
fn float_key(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        let whole = format!("{f:.0}");
        if whole == "-0" { "0".into() } else { whole }
    } else {
        f.to_string()
    }
}

fn enum_key(raw: &serde_json::Value) -> String {
    match raw {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => number_value(n).1,
        other => other.to_string(),
    }
}

/// Blank unit text means "no unit".
pub fn normalize_unit(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn enums(raw: serde_json::Value) -> Vec<EnumValue> {
        serde_json::from_value(raw).unwrap()
    }

    fn num(raw: serde_json::Value) -> Number {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn splits_number_and_unit() {
        assert_eq!(parse_text_value("21.5°C"), ("21.5".into(), Some("°C".into())));
        assert_eq!(parse_text_value("-3,2 kWh"), ("-3,2".into(), Some("kWh".into())));
        assert_eq!(parse_text_value("1200 rpm"), ("1200".into(), Some("rpm".into())));
        assert_eq!(parse_text_value("35%"), ("35".into(), Some("%".into())));
    }

    #[test]
    fn bare_numbers_have_no_unit() {
        assert_eq!(parse_text_value("-5"), ("-5".into(), None));
        assert_eq!(parse_text_value("12,75"), ("12,75".into(), None));
    }

    #[test]
    fn text_states_pass_through() {
        assert_eq!(parse_text_value("On"), ("On".into(), None));
        assert_eq!(parse_text_value("Off"), ("Off".into(), None));
        assert_eq!(parse_text_value(""), (String::new(), None));
        // a digit after the unit breaks the pattern
        assert_eq!(parse_text_value("5 kW 2"), ("5 kW 2".into(), None));
    }

    #[test]
    fn envelope_dates_in_every_format() {
        let expected = NaiveDateTime::parse_from_str("2024-03-14 10:15:30", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        for raw in [
            "03/14/2024 10:15:30",
            "2024. 03. 14. 10:15:30",
            "2024-03-14 10:15:30",
            "14-03-2024 10:15:30",
            "14.03.2024 10:15:30",
            "14.03.2024 10.15.30",
        ] {
            assert_eq!(parse_envelope_date(raw).unwrap(), expected, "format of {raw}");
        }
    }

    #[test]
    fn first_matching_format_wins() {
        // valid as month/day; never reaches a day-first format
        let parsed = parse_envelope_date("04/05/2024 00:00:00").unwrap();
        assert_eq!(parsed.format("%Y-%m-%d").to_string(), "2024-04-05");
    }

    #[test]
    fn unknown_envelope_date_is_response_error() {
        let err = parse_envelope_date("Thursday, 14 March").unwrap_err();
        assert!(matches!(err, CoreError::Response { .. }));
    }

    #[test]
    fn float_point_without_enum_falls_back_to_number() {
        let (value, label) = parse_point_value(Some(&num(json!(21.5))), &[]);
        assert_eq!(value, Some(Value::Float(21.5)));
        assert_eq!(label.as_deref(), Some("21.5"));
    }

    #[test]
    fn whole_float_matches_integer_enum() {
        let table = enums(json!([
            { "value": "0", "text": "Off" },
            { "value": "1", "text": "On" }
        ]));
        let (value, label) = parse_point_value(Some(&num(json!(1.0))), &table);
        assert_eq!(value, Some(Value::Float(1.0)));
        assert_eq!(label.as_deref(), Some("On"));
    }

    #[test]
    fn integer_point_matches_numeric_enum_value() {
        let table = enums(json!([{ "value": 2, "text": "Step 2" }]));
        let (value, label) = parse_point_value(Some(&num(json!(2))), &table);
        assert_eq!(value, Some(Value::Integer(2)));
        assert_eq!(label.as_deref(), Some("Step 2"));
    }

    #[test]
    fn enum_entry_without_text_falls_back() {
        let table = enums(json!([{ "value": "3" }]));
        let (_, label) = parse_point_value(Some(&num(json!(3))), &table);
        assert_eq!(label.as_deref(), Some("3"));
    }

    #[test]
    fn missing_point_value_is_null() {
        assert_eq!(parse_point_value(None, &[]), (None, None));
    }

    #[test]
    fn history_values_keep_json_kind() {
        assert_eq!(history_value(json!(4.5)), Some(Value::Float(4.5)));
        assert_eq!(history_value(json!(7)), Some(Value::Integer(7)));
        assert_eq!(history_value(json!(null)), None);
        assert_eq!(history_value(json!("On")), Some(Value::Text("On".into())));
    }

    #[test]
    fn history_timestamp_from_millis() {
        let ts = history_timestamp(1_700_000_000_500).unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(ts.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn blank_units_are_none() {
        assert_eq!(normalize_unit(""), None);
        assert_eq!(normalize_unit("  "), None);
        assert_eq!(normalize_unit(" °C"), Some("°C".into()));
    }
}
