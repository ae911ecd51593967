//! History command handler.

use tabled::Tabled;
use upway_core::{UpwayClient, VariableHistoryValue};

use super::util;
use crate::cli::{GlobalOpts, HistoryArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Unit")]
    unit: String,
}

impl From<&VariableHistoryValue> for HistoryRow {
    fn from(h: &VariableHistoryValue) -> Self {
        Self {
            time: h.timestamp.to_rfc3339(),
            value: output::cell(h.value.as_ref()),
            unit: output::cell(h.unit.as_deref()),
        }
    }
}

pub async fn handle(
    args: HistoryArgs,
    client: &mut UpwayClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let variable = util::parse_variable(&args.variable)?;
    let start = util::parse_instant("start", &args.start)?;
    let stop = util::parse_instant("stop", &args.stop)?;
    if stop < start {
        return Err(CliError::Validation {
            field: "stop".into(),
            reason: "must not be before start".into(),
        });
    }

    let history = client
        .get_history_values(variable, start, stop, args.resolution, args.force_login)
        .await?;

    if history.is_empty() {
        tracing::info!(service = %client.service(), "no history returned");
    }

    let out = output::render_list(&global.output, &history, |h| HistoryRow::from(h), |h| {
        format!("{}\t{}", h.timestamp.to_rfc3339(), output::cell(h.value.as_ref()))
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
