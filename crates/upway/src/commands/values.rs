//! Current values command handler.

use tabled::Tabled;
use upway_core::{UpwayClient, VariableValue};

use super::util;
use crate::cli::{GlobalOpts, ValuesArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ValueRow {
    #[tabled(rename = "Variable")]
    name: &'static str,
    #[tabled(rename = "Id")]
    id: u32,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&VariableValue> for ValueRow {
    fn from(v: &VariableValue) -> Self {
        Self {
            name: v.name,
            id: v.id,
            value: output::cell(v.value.as_ref()),
            unit: output::cell(v.unit.as_deref()),
            label: output::cell(v.enum_label.as_deref()),
            updated: output::cell(v.updated_at.map(|t| t.format("%Y-%m-%d %H:%M:%S"))),
        }
    }
}

fn plain_line(v: &VariableValue) -> String {
    let value = output::cell(v.value.as_ref());
    match v.unit {
        Some(ref unit) => format!("{}\t{value} {unit}", v.name),
        None => format!("{}\t{value}", v.name),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    args: ValuesArgs,
    client: &mut UpwayClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let variables = args
        .variables
        .iter()
        .map(|name| util::parse_variable(name))
        .collect::<Result<Vec<_>, _>>()?;

    let values = client
        .get_current_values(Some(variables.as_slice()), args.force_login)
        .await?;

    let out = output::render_list(&global.output, &values, |v| ValueRow::from(v), plain_line)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
