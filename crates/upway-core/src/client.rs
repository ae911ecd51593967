// ── Unified client ──
//
// Single entry point for consumers. Picks the adapter from the
// configured service and forwards every call to it.

use chrono::{DateTime, Utc};
use tracing::debug;

use upway_api::DataService;

use crate::catalog::{Variable, VariableCatalog};
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::{VariableHistoryValue, VariableValue};
use crate::service::{DataServiceClient, MyUplinkService, MyUpwayService};

enum Backend {
    MyUpway(MyUpwayService),
    MyUplink(MyUplinkService),
}

/// Heat pump telemetry client over either data service.
///
/// Not shareable across tasks: every call takes `&mut self`.
pub struct UpwayClient {
    backend: Backend,
}

impl UpwayClient {
    /// Build a client for `config`'s service. Does NOT log in; call
    /// [`login()`](Self::login), or use [`connect()`](Self::connect).
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let backend = match config.service() {
            DataService::MyUpway => Backend::MyUpway(MyUpwayService::new(config)?),
            DataService::MyUplink => Backend::MyUplink(MyUplinkService::new(config)?),
        };
        debug!(service = %config.service(), base_url = %config.base_url(), "client created");
        Ok(Self { backend })
    }

    /// Build a client and log in.
    pub async fn connect(config: &ClientConfig) -> Result<Self, CoreError> {
        let mut client = Self::new(config)?;
        client.login().await?;
        Ok(client)
    }

    pub fn service(&self) -> DataService {
        match &self.backend {
            Backend::MyUpway(s) => s.service(),
            Backend::MyUplink(s) => s.service(),
        }
    }

    /// Device bound to the session. MyUpway knows it from the config;
    /// myUplink learns it at login.
    pub fn device_id(&self) -> Option<&str> {
        match &self.backend {
            Backend::MyUpway(s) => s.device_id(),
            Backend::MyUplink(s) => s.device_id(),
        }
    }

    /// Online state as of the last successful read (or login).
    pub fn is_online(&self) -> bool {
        match &self.backend {
            Backend::MyUpway(s) => s.is_online(),
            Backend::MyUplink(s) => s.is_online(),
        }
    }

    /// Variables this client's service can report.
    pub fn catalog(&self) -> &VariableCatalog {
        match &self.backend {
            Backend::MyUpway(s) => s.catalog(),
            Backend::MyUplink(s) => s.catalog(),
        }
    }

    pub async fn login(&mut self) -> Result<(), CoreError> {
        match &mut self.backend {
            Backend::MyUpway(s) => s.login().await,
            Backend::MyUplink(s) => s.login().await,
        }
    }

    /// Current values of `variables`; `None` or an empty slice asks for
    /// everything the service reports.
    pub async fn get_current_values(
        &mut self,
        variables: Option<&[Variable]>,
        force_login: bool,
    ) -> Result<Vec<VariableValue>, CoreError> {
        match &mut self.backend {
            Backend::MyUpway(s) => s.get_current_values(variables, force_login).await,
            Backend::MyUplink(s) => s.get_current_values(variables, force_login).await,
        }
    }

    /// Samples of `variable` between `start` and `stop`.
    /// Always empty on myUplink.
    pub async fn get_history_values(
        &mut self,
        variable: Variable,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        resolution: u32,
        force_login: bool,
    ) -> Result<Vec<VariableHistoryValue>, CoreError> {
        match &mut self.backend {
            Backend::MyUpway(s) => {
                s.get_history_values(variable, start, stop, resolution, force_login)
                    .await
            }
            Backend::MyUplink(s) => {
                s.get_history_values(variable, start, stop, resolution, force_login)
                    .await
            }
        }
    }

    pub async fn logout(&mut self) {
        match &mut self.backend {
            Backend::MyUpway(s) => s.logout().await,
            Backend::MyUplink(s) => s.logout().await,
        }
    }
}
