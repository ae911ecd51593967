// ── Data service adapters ──
//
// One adapter per remote service. Each owns its full authentication
// state and maps its service's payloads into the unified model.

mod myuplink;
mod myupway;

use std::future::Future;

use chrono::{DateTime, Utc};

use upway_api::DataService;

use crate::catalog::Variable;
use crate::error::CoreError;
use crate::model::{VariableHistoryValue, VariableValue};

pub use myuplink::MyUplinkService;
pub use myupway::MyUpwayService;

/// Default bucket count for history queries.
pub const DEFAULT_RESOLUTION: u32 = 1000;

/// The contract both service adapters implement.
///
/// Methods take `&mut self`: authentication state is plain owned data
/// and one adapter serves one caller at a time.
pub trait DataServiceClient {
    fn service(&self) -> DataService;

    /// Device the adapter is bound to, once known.
    fn device_id(&self) -> Option<&str>;

    /// Online state as last reported by the service.
    fn is_online(&self) -> bool;

    /// Authenticate from scratch, replacing any previous session.
    fn login(&mut self) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Current values for `variables`, or for the whole catalog when
    /// `None` or empty.
    fn get_current_values(
        &mut self,
        variables: Option<&[Variable]>,
        force_login: bool,
    ) -> impl Future<Output = Result<Vec<VariableValue>, CoreError>> + Send;

    /// Samples of one variable between `start` and `stop`.
    fn get_history_values(
        &mut self,
        variable: Variable,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        resolution: u32,
        force_login: bool,
    ) -> impl Future<Output = Result<Vec<VariableHistoryValue>, CoreError>> + Send;

    /// End the session. Never fails; problems are logged.
    fn logout(&mut self) -> impl Future<Output = ()> + Send;
}

/// Requested variables, or `None` for "everything".
fn requested(variables: Option<&[Variable]>) -> Option<&[Variable]> {
    variables.filter(|v| !v.is_empty())
}
