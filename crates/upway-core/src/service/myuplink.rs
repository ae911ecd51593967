// myUplink API adapter
//
// Session state is the bearer token inside `MyUplinkClient` plus the
// device bound at login. Token expiry is only discovered through a 401,
// which triggers one refresh and one retry. The API exposes parameters
// this catalog may not know; those points are skipped.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, info, warn};

use upway_api::DataService;
use upway_api::myuplink::MyUplinkClient;
use upway_api::myuplink::types::Point;

use super::{DataServiceClient, requested};
use crate::catalog::{Variable, VariableCatalog};
use crate::config::{AuthCredentials, ClientConfig};
use crate::error::CoreError;
use crate::model::{VariableHistoryValue, VariableValue};
use crate::parse;

/// Adapter for the myUplink REST API.
pub struct MyUplinkService {
    client: MyUplinkClient,
    catalog: Arc<VariableCatalog>,
    device_id: Option<String>,
    is_online: bool,
}

impl MyUplinkService {
    /// Build an adapter without fetching a token.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let AuthCredentials::ClientCredentials {
            client_id,
            client_secret,
        } = config.auth()
        else {
            return Err(CoreError::Configuration {
                field: "auth".into(),
                reason: "MyUplink needs client credentials".into(),
            });
        };

        let client = MyUplinkClient::new(
            config.base_url().clone(),
            client_id.clone(),
            client_secret.clone(),
            &config.transport(),
        )?;

        Ok(Self {
            client,
            catalog: VariableCatalog::for_service(DataService::MyUplink),
            device_id: None,
            is_online: false,
        })
    }

    /// Use a custom catalog instead of the built-in one.
    pub fn with_catalog(mut self, catalog: Arc<VariableCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    /// Device to query, logging in first when allowed.
    async fn bound_device(&mut self, force_login: bool) -> Result<String, CoreError> {
        if self.device_id.is_none() && force_login {
            self.login().await?;
        }
        self.device_id.clone().ok_or(CoreError::NotLoggedIn)
    }

    fn ids_for(&self, variables: Option<&[Variable]>) -> Result<Option<Vec<u32>>, CoreError> {
        let Some(variables) = requested(variables) else {
            return Ok(None);
        };
        variables
            .iter()
            .map(|&variable| {
                self.catalog
                    .id_of(variable)
                    .ok_or(CoreError::UnsupportedVariable {
                        variable,
                        service: DataService::MyUplink,
                    })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Fetch points, refreshing the token once if it was rejected.
    async fn fetch_points(
        &mut self,
        device_id: &str,
        ids: Option<&[u32]>,
    ) -> Result<Vec<Point>, CoreError> {
        match self.client.points(device_id, ids).await {
            Err(e) if e.is_auth_expired() => {
                info!("myUplink token rejected, refreshing");
                self.client.fetch_token().await?;
                Ok(self.client.points(device_id, ids).await?)
            }
            other => Ok(other?),
        }
    }

    fn map_points(&self, points: Vec<Point>) -> Vec<VariableValue> {
        let mut seen = HashSet::new();
        let mut results = Vec::with_capacity(points.len());

        for point in points {
            let Some(variable) = point
                .parameter_id
                .as_u32()
                .and_then(|id| self.catalog.lookup(id).map(|v| (id, v)))
            else {
                warn!(
                    parameter_id = %point.parameter_id,
                    name = point.parameter_name.as_deref().unwrap_or(""),
                    "skipping point with no catalog entry"
                );
                continue;
            };
            let (id, variable) = variable;

            if !seen.insert(id) {
                debug!(id, "dropping duplicate point");
                continue;
            }

            let (value, enum_label) = parse::parse_point_value(point.value.as_ref(), &point.enum_values);
            results.push(VariableValue {
                id,
                name: variable.name(),
                variable,
                value,
                unit: point.parameter_unit.as_deref().and_then(parse::normalize_unit),
                enum_label,
                updated_at: point.timestamp.as_deref().and_then(sample_time),
            });
        }

        results
    }
}

/// Point timestamps are RFC 3339; kept as UTC wall time.
fn sample_time(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.naive_utc())
        .map_err(|e| debug!(raw, error = %e, "unparseable point timestamp"))
        .ok()
}

impl DataServiceClient for MyUplinkService {
    fn service(&self) -> DataService {
        DataService::MyUplink
    }

    fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    fn is_online(&self) -> bool {
        self.is_online
    }

    /// Fetch a token, then bind the first device of the first system.
    async fn login(&mut self) -> Result<(), CoreError> {
        self.client.fetch_token().await?;

        let systems = self.client.systems().await?;
        let device = systems
            .systems
            .into_iter()
            .next()
            .and_then(|system| system.devices.into_iter().next())
            .ok_or_else(|| CoreError::response("myUplink account has no devices"))?;

        self.is_online = device.is_connected();
        info!(device_id = %device.id, online = self.is_online, "bound myUplink device");
        self.device_id = Some(device.id);
        Ok(())
    }

    async fn get_current_values(
        &mut self,
        variables: Option<&[Variable]>,
        force_login: bool,
    ) -> Result<Vec<VariableValue>, CoreError> {
        let ids = self.ids_for(variables)?;
        let device_id = self.bound_device(force_login).await?;
        let points = self.fetch_points(&device_id, ids.as_deref()).await?;
        Ok(self.map_points(points))
    }

    /// myUplink has no history endpoint; always empty, no request made.
    async fn get_history_values(
        &mut self,
        variable: Variable,
        _start: DateTime<Utc>,
        _stop: DateTime<Utc>,
        _resolution: u32,
        _force_login: bool,
    ) -> Result<Vec<VariableHistoryValue>, CoreError> {
        debug!(%variable, "history is not available on myUplink");
        Ok(Vec::new())
    }

    /// Tokens have no server-side session to end.
    async fn logout(&mut self) {}
}
