use crate::display::{format_state, print_json, Table};
use crate::Result;
use log::debug;
use serde::Serialize;
use subnetter_core::{LifecycleState, LogSink, StatusNormalizer};

#[derive(Debug, Serialize)]
struct StatusRow<'a> {
    provider: &'a str,
    state: LifecycleState,
}

/// Handle the status command. Unmapped statuses print `unknown` and log a warning.
pub fn handle(statuses: &[String], json: bool) -> Result<()> {
    debug!("Normalizing {} statuses", statuses.len());
    let normalizer = StatusNormalizer::new(LogSink);
    let rows: Vec<StatusRow> = statuses
        .iter()
        .map(|status| StatusRow {
            provider: status,
            state: normalizer.normalize(status),
        })
        .collect();

    if json {
        return print_json(&rows);
    }

    let mut table = Table::new(&["PROVIDER STATUS", "STATE"]);
    for row in &rows {
        table.add_row(vec![row.provider.to_string(), format_state(row.state)]);
    }
    table.print();

    Ok(())
}
