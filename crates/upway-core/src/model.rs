// ── Unified value model ──
//
// Both services are normalized into these types. Consumers never see
// the portal's inline-unit strings or the API's point records.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::catalog::Variable;

/// A reading as reported by a service.
///
/// Portal readings stay textual (`Text("21,5")`) so decimal separators
/// and precision survive untouched; API readings keep their JSON number
/// kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the value. Text is parsed with either `.` or `,`
    /// as decimal separator.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().replace(',', ".").parse().ok(),
            Self::Bool(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Current value of one catalog variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableValue {
    /// Service-specific numeric id.
    pub id: u32,
    /// Symbolic variable name.
    pub name: &'static str,
    pub variable: Variable,
    pub value: Option<Value>,
    /// `None` when the service reported no unit -- never an empty string.
    pub unit: Option<String>,
    /// Label of an enumerated value (myUplink only).
    pub enum_label: Option<String>,
    /// When the service sampled the value, in the service's clock.
    pub updated_at: Option<NaiveDateTime>,
}

/// One sample of a history series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableHistoryValue {
    pub value: Option<Value>,
    pub unit: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_numbers_accept_both_separators() {
        assert_eq!(Value::Text("21.5".into()).as_f64(), Some(21.5));
        assert_eq!(Value::Text("-3,2".into()).as_f64(), Some(-3.2));
        assert_eq!(Value::Text("On".into()).as_f64(), None);
        assert_eq!(Value::Integer(7).as_f64(), Some(7.0));
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Integer(2),
            Value::Float(21.5),
            Value::Text("On".into()),
        ])
        .unwrap_or_default();
        assert_eq!(json, r#"[2,21.5,"On"]"#);
    }
}
