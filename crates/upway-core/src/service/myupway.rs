// MyUpway portal adapter
//
// Session state is the portal cookie jar inside `MyUpwayClient`. The
// catalog is treated as complete for the portal: an id it does not know
// fails the whole call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use upway_api::DataService;
use upway_api::myupway::{HistoryQuery, HistoryResponse, MyUpwayClient, ValuesResponse};

use super::{DataServiceClient, requested};
use crate::catalog::{Variable, VariableCatalog};
use crate::config::{AuthCredentials, ClientConfig};
use crate::error::CoreError;
use crate::model::{Value, VariableHistoryValue, VariableValue};
use crate::parse;

/// Adapter for the MyUpway web portal.
pub struct MyUpwayService {
    client: MyUpwayClient,
    username: String,
    password: SecretString,
    catalog: Arc<VariableCatalog>,
    device_id: String,
    is_online: bool,
}

impl MyUpwayService {
    /// Build an adapter without logging in.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let AuthCredentials::Portal {
            username,
            password,
            heatpump_id,
        } = config.auth()
        else {
            return Err(CoreError::Configuration {
                field: "auth".into(),
                reason: "MyUpway needs portal credentials".into(),
            });
        };

        let client = MyUpwayClient::new(config.base_url().clone(), *heatpump_id, &config.transport())?;

        Ok(Self {
            client,
            username: username.clone(),
            password: password.clone(),
            catalog: VariableCatalog::for_service(DataService::MyUpway),
            device_id: heatpump_id.to_string(),
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

    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    /// Log in again when allowed and needed; fail if still unauthenticated.
    async fn ensure_authenticated(&mut self, force_login: bool) -> Result<(), CoreError> {
        if !self.client.is_authenticated() && force_login {
            debug!("session missing, forcing login");
            self.login().await?;
        }
        if self.client.is_authenticated() {
            Ok(())
        } else {
            Err(CoreError::NotLoggedIn)
        }
    }

    fn ids_for(&self, variables: Option<&[Variable]>) -> Result<Vec<u32>, CoreError> {
        match requested(variables) {
            None => Ok(self.catalog.ids()),
            Some(variables) => variables
                .iter()
                .map(|&variable| {
                    self.catalog
                        .id_of(variable)
                        .ok_or(CoreError::UnsupportedVariable {
                            variable,
                            service: DataService::MyUpway,
                        })
                })
                .collect(),
        }
    }

    async fn fetch_values(&mut self, ids: &[u32]) -> Result<Vec<VariableValue>, CoreError> {
        let resp = self.client.values(ids).await?;
        self.map_values(resp)
    }

    fn map_values(&mut self, resp: ValuesResponse) -> Result<Vec<VariableValue>, CoreError> {
        let updated_at = parse::parse_envelope_date(&resp.date)?;
        self.is_online = !resp.is_offline;

        resp.values
            .into_iter()
            .map(|raw| {
                let variable = self
                    .catalog
                    .lookup(raw.variable_id)
                    .ok_or(CoreError::UnmappedVariable {
                        id: raw.variable_id,
                    })?;
                let (value, unit) = parse::parse_text_value(&raw.current_value);
                Ok(VariableValue {
                    id: raw.variable_id,
                    name: variable.name(),
                    variable,
                    value: Some(Value::Text(value)),
                    unit,
                    enum_label: None,
                    updated_at: Some(updated_at),
                })
            })
            .collect()
    }

    fn map_history(resp: HistoryResponse) -> Result<Vec<VariableHistoryValue>, CoreError> {
        let unit = parse::normalize_unit(&resp.unit);
        resp.data
            .into_iter()
            .map(|point| {
                Ok(VariableHistoryValue {
                    timestamp: parse::history_timestamp(point.0)?,
                    value: parse::history_value(point.1),
                    unit: unit.clone(),
                })
            })
            .collect()
    }
}

impl DataServiceClient for MyUpwayService {
    fn service(&self) -> DataService {
        DataService::MyUpway
    }

    fn device_id(&self) -> Option<&str> {
        Some(&self.device_id)
    }

    fn is_online(&self) -> bool {
        self.is_online
    }

    /// Log in, then read every value once to learn the online state.
    async fn login(&mut self) -> Result<(), CoreError> {
        self.client.login(&self.username, &self.password).await?;
        info!(heatpump_id = %self.device_id, "logged in to MyUpway");

        // A login whose first read fails is not a usable session.
        let ids = self.catalog.ids();
        if let Err(e) = self.fetch_values(&ids).await {
            self.client.invalidate()?;
            return Err(e);
        }
        Ok(())
    }

    async fn get_current_values(
        &mut self,
        variables: Option<&[Variable]>,
        force_login: bool,
    ) -> Result<Vec<VariableValue>, CoreError> {
        let ids = self.ids_for(variables)?;
        self.ensure_authenticated(force_login).await?;
        self.fetch_values(&ids).await
    }

    async fn get_history_values(
        &mut self,
        variable: Variable,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        resolution: u32,
        force_login: bool,
    ) -> Result<Vec<VariableHistoryValue>, CoreError> {
        let variable_id =
            self.catalog
                .id_of(variable)
                .ok_or(CoreError::UnsupportedVariable {
                    variable,
                    service: DataService::MyUpway,
                })?;

        self.ensure_authenticated(force_login).await?;

        let query = HistoryQuery {
            variable_id,
            start,
            stop,
            resolution,
        };
        let resp = self.client.history(&query).await?;
        Self::map_history(resp)
    }

    async fn logout(&mut self) {
        if let Err(e) = self.client.logout().await {
            warn!(error = %e, "MyUpway logout failed");
        }
    }
}
