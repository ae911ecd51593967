// myUplink API wire types
//
// Only the fields the client consumes are modelled; everything else the
// API returns is ignored by serde.

use serde::{Deserialize, Serialize};

/// `POST /oauth/token` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// `GET /v2/systems/me` response (one page).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemsResponse {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub items_per_page: Option<u32>,
    #[serde(default)]
    pub num_items: Option<u32>,
    #[serde(default)]
    pub systems: Vec<System>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct System {
    #[serde(default)]
    pub system_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub devices: Vec<SystemDevice>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDevice {
    pub id: String,
    /// `"Connected"`, `"Disconnected"`, ...
    #[serde(default)]
    pub connection_state: String,
}

impl SystemDevice {
    pub fn is_connected(&self) -> bool {
        self.connection_state == "Connected"
    }
}

/// Parameter id as the API sends it -- documented as a string, but
/// numbers show up too.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ParameterId {
    Number(u64),
    Text(String),
}

impl ParameterId {
    /// Numeric form, if the id is a valid `u32`.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Number(n) => u32::try_from(*n).ok(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for ParameterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One entry of `GET /v2/devices/{id}/points`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub parameter_id: ParameterId,
    #[serde(default)]
    pub parameter_name: Option<String>,
    #[serde(default)]
    pub parameter_unit: Option<String>,
    /// Last sample time, RFC 3339.
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Number>,
    #[serde(default)]
    pub enum_values: Vec<EnumValue>,
}

/// `{value, text}` mapping of a raw enum value to its label.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnumValue {
    /// Usually a string (`"1"`), occasionally a number.
    pub value: serde_json::Value,
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn point_accepts_string_and_numeric_ids() {
        let points: Vec<Point> = serde_json::from_value(json!([
            { "parameterId": "40004", "value": -3.5, "parameterUnit": "°C", "enumValues": [] },
            { "parameterId": 43091, "value": 2, "parameterUnit": "", "enumValues": [
                { "value": "2", "text": "step 2", "icon": "" }
            ]}
        ]))
        .unwrap();

        assert_eq!(points[0].parameter_id.as_u32(), Some(40004));
        assert_eq!(points[1].parameter_id.as_u32(), Some(43091));
        assert_eq!(points[1].enum_values[0].text.as_deref(), Some("step 2"));
        assert!(points[1].value.as_ref().unwrap().is_u64());
    }

    #[test]
    fn non_numeric_parameter_id_has_no_u32() {
        let id = ParameterId::Text("rmu-1".into());
        assert_eq!(id.as_u32(), None);
        assert_eq!(id.to_string(), "rmu-1");
    }

    #[test]
    fn systems_listing_deserializes() {
        let resp: SystemsResponse = serde_json::from_value(json!({
            "page": 1,
            "itemsPerPage": 10,
            "numItems": 1,
            "systems": [{
                "systemId": "sys-1",
                "name": "Home",
                "devices": [{ "id": "dev-1", "connectionState": "Connected" }]
            }]
        }))
        .unwrap();

        let device = &resp.systems[0].devices[0];
        assert_eq!(device.id, "dev-1");
        assert!(device.is_connected());
    }
}
