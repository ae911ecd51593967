// MyUpway private API value endpoints
//
// Current values and chart history for the bound heat pump.

use tracing::debug;

use crate::error::Error;
use crate::myupway::client::MyUpwayClient;
use crate::myupway::models::{HistoryQuery, HistoryResponse, ValuesResponse};

impl MyUpwayClient {
    /// Fetch current values for the given variable ids.
    ///
    /// `POST /PrivateAPI/Values` with `hpid` and one `variables` field per id.
    pub async fn values(&mut self, variable_ids: &[u32]) -> Result<ValuesResponse, Error> {
        debug!(count = variable_ids.len(), "fetching current values");

        let mut form = Vec::with_capacity(variable_ids.len() + 1);
        form.push(("hpid", self.heatpump_id().to_string()));
        form.extend(variable_ids.iter().map(|id| ("variables", id.to_string())));

        self.post_form("/PrivateAPI/Values", &form).await
    }

    /// Fetch a resolution-bucketed series for one variable.
    ///
    /// `POST /PrivateAPI/History`
    pub async fn history(&mut self, query: &HistoryQuery) -> Result<HistoryResponse, Error> {
        debug!(
            variable_id = query.variable_id,
            resolution = query.resolution,
            "fetching history"
        );

        let form = query.form(self.heatpump_id());
        self.post_form("/PrivateAPI/History", &form).await
    }
}
