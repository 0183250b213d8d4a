//! Rendering of processed records: table, JSON, plain text, or CSV.

use comfy_table::{ContentArrangement, Table};
use serde_json::Value;

use loggenie_core::record::CanonicalRecord;

use crate::cli::OutputFormat;

/// Maximum displayed value width in table output.
const TABLE_VALUE_WIDTH: usize = 80;

/// Render records into the requested format.
pub fn render(records: &[CanonicalRecord], field: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(records)
            .unwrap_or_else(|_| serde_json::to_string(records).unwrap_or_default()),
        OutputFormat::Table => render_table(records, field),
        OutputFormat::Text => render_text(records, field),
        OutputFormat::Csv => render_csv(records, field),
    }
}

fn render_table(records: &[CanonicalRecord], field: &str) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Index", "Status", field]);
    for record in records {
        table.add_row(vec![
            record.id.clone(),
            record.index.clone(),
            status(record).to_owned(),
            truncate(&display_value(record, field), TABLE_VALUE_WIDTH),
        ]);
    }
    table.to_string()
}

fn render_text(records: &[CanonicalRecord], field: &str) -> String {
    records
        .iter()
        .map(|r| format!("{}\t{}", r.id, display_value(r, field)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_csv(records: &[CanonicalRecord], field: &str) -> String {
    let mut out = String::from("id,index,status,value\n");
    for record in records {
        out.push_str(&format!(
            "{},{},{},{}\n",
            csv_escape(&record.id),
            csv_escape(&record.index),
            status(record),
            csv_escape(&display_value(record, field)),
        ));
    }
    out
}

fn status(record: &CanonicalRecord) -> &'static str {
    if record.is_decrypted() {
        "ok"
    } else if record.decryption_error().is_some() {
        "failed"
    } else {
        "skipped"
    }
}

/// The most informative value for one record: the decrypted payload, the
/// error message, or the original field value.
fn display_value(record: &CanonicalRecord, field: &str) -> String {
    if let Some(err) = record.decryption_error() {
        return err.to_owned();
    }
    let key = if record.is_decrypted() {
        format!("decrypted_{field}")
    } else {
        field.to_owned()
    };
    match record.source.get(&key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Escape a value for CSV output.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_owned()
    } else {
        let cut: String = value.chars().take(max).collect();
        format!("{cut}…")
    }
}
