//! Variable catalog listing. Needs no network access.

use serde::Serialize;
use tabled::Tabled;
use upway_core::DataService;
use upway_core::catalog::BUILTIN_ROWS;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct VariableInfo {
    name: &'static str,
    myupway: Option<u32>,
    myuplink: Option<u32>,
}

#[derive(Tabled)]
struct VariableRow {
    #[tabled(rename = "Variable")]
    name: &'static str,
    #[tabled(rename = "MyUpway")]
    myupway: String,
    #[tabled(rename = "MyUplink")]
    myuplink: String,
}

impl From<&VariableInfo> for VariableRow {
    fn from(v: &VariableInfo) -> Self {
        Self {
            name: v.name,
            myupway: output::cell(v.myupway),
            myuplink: output::cell(v.myuplink),
        }
    }
}

/// List catalog variables with their ids, restricted to the selected
/// service when one is known.
pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let service = config::selected_service(global, &cfg);

    let variables: Vec<VariableInfo> = BUILTIN_ROWS
        .iter()
        .filter(|row| match service {
            Some(DataService::MyUpway) => row.myupway.is_some(),
            Some(DataService::MyUplink) => row.myuplink.is_some(),
            None => true,
        })
        .map(|row| VariableInfo {
            name: row.variable.name(),
            myupway: row.myupway,
            myuplink: row.myuplink,
        })
        .collect();

    let out = output::render_list(
        &global.output,
        &variables,
        |v| VariableRow::from(v),
        |v| v.name.to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
