use crate::cleanup::{CleanupReport, DeletionOutcome, DeletionStatus};
use crate::list::ListedRow;
use bench_result_model::ResultRecord;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Renders a single result record for people to read.
pub trait ResultFormatter {
    fn format(&self, record: &ResultRecord) -> String;
}

/// Renders the result payload as a table, below the status and message of the run.
///
/// Payloads that are an array of objects become one row per object, with a column for every key
/// seen, in the order first seen. Anything else is printed as pretty JSON.
#[derive(Debug, Default)]
pub struct TableFormatter;

impl ResultFormatter for TableFormatter {
    fn format(&self, record: &ResultRecord) -> String {
        let body = payload_table(record);
        match (record.status(), record.message()) {
            (Some(status), Some(message)) => format!("{status} {message}\n{body}"),
            (Some(status), None) => format!("{status}\n{body}"),
            _ => body,
        }
    }
}

fn payload_table(record: &ResultRecord) -> String {
    let Some(payload) = record.payload() else {
        return pretty_json(record.as_value());
    };

    let Some(rows) = payload
        .as_array()
        .and_then(|rows| rows.iter().map(Value::as_object).collect::<Option<Vec<_>>>())
        .filter(|rows| !rows.is_empty())
    else {
        return pretty_json(payload);
    };

    let mut columns: Vec<&String> = Vec::new();
    for row in &rows {
        for key in row.keys() {
            if !columns.contains(&key) {
                columns.push(key);
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| c.to_string()));
    for row in &rows {
        builder.push_record(
            columns
                .iter()
                .map(|c| row.get(*c).map(cell).unwrap_or_default()),
        );
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.to_string()
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[derive(Tabled)]
struct ListedRowTable<'a> {
    scenario: &'a str,
    module_startup: bool,
    time: &'a str,
    cpu: &'a str,
    filename: &'a str,
}

/// Render listed results as a detail table.
pub fn listed_rows_table(rows: &[ListedRow]) -> String {
    let rows = rows
        .iter()
        .map(|row| ListedRowTable {
            scenario: &row.scenario,
            module_startup: row.module_startup,
            time: &row.time,
            cpu: row.cpu.as_deref().unwrap_or_default(),
            filename: &row.filename,
        })
        .collect::<Vec<_>>();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.to_string()
}

#[derive(Tabled)]
struct OutcomeTable<'a> {
    filename: &'a str,
    status: &'static str,
    error: &'a str,
}

impl<'a> From<&'a DeletionOutcome> for OutcomeTable<'a> {
    fn from(outcome: &'a DeletionOutcome) -> Self {
        let (status, error) = match &outcome.status {
            DeletionStatus::Deleted => ("deleted", ""),
            DeletionStatus::WouldDelete => ("would delete", ""),
            DeletionStatus::Failed(e) => ("failed", e.as_str()),
        };
        Self {
            filename: &outcome.filename,
            status,
            error,
        }
    }
}

/// Render the outcomes of a cleanup as a table.
pub fn cleanup_report_table(report: &CleanupReport) -> String {
    let rows = report
        .outcomes
        .iter()
        .map(OutcomeTable::from)
        .collect::<Vec<_>>();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.to_string()
}
