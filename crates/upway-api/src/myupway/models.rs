// MyUpway portal wire types
//
// Shapes of the `/PrivateAPI/*` JSON responses. Field names follow the
// portal verbatim (PascalCase for values, lowercase for history).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope returned by `POST /PrivateAPI/Values`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValuesResponse {
    pub is_offline: bool,
    #[serde(default)]
    pub online_image: String,
    /// Local portal time; one of several locale-dependent formats.
    pub date: String,
    #[serde(default)]
    pub fuzzy_date: String,
    #[serde(default)]
    pub values: Vec<RawValue>,
}

/// One `{VariableId, CurrentValue}` pair. The value carries its unit inline
/// (`"21.5°C"`), or is a plain state text (`"On"`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawValue {
    pub variable_id: u32,
    pub current_value: String,
}

/// Response of `POST /PrivateAPI/History` -- a chart series for one variable.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub data: Vec<HistoryPoint>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub variableid: u32,
    /// Unit shared by every point; empty when the variable has none.
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub isfullzoom: bool,
    #[serde(default)]
    pub reloadoverview: bool,
    #[serde(default)]
    pub yaxis: i32,
    #[serde(rename = "NumberOfDecimals", default)]
    pub number_of_decimals: i32,
}

/// `[timestampMillis, value]`. The value is whatever JSON the chart carries.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryPoint(pub i64, pub serde_json::Value);

/// Parameters of a history request.
#[derive(Debug, Clone)]
pub struct HistoryQuery {
    pub variable_id: u32,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    /// Bucket count requested from the portal's chart endpoint.
    pub resolution: u32,
}

impl HistoryQuery {
    /// Form fields for the history endpoint.
    pub(crate) fn form(&self, heatpump_id: u64) -> Vec<(&'static str, String)> {
        vec![
            ("hpid", heatpump_id.to_string()),
            ("variableId", self.variable_id.to_string()),
            ("resolution", self.resolution.to_string()),
            ("startDate", self.start.timestamp().to_string()),
            ("stopDate", self.stop.timestamp().to_string()),
            ("isFullZoom", "true".into()),
            ("reloadOverview", "true".into()),
        ]
    }
}
