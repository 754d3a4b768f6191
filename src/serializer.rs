//! Serialization module for writing application reports as JSON, YAML or a Markdown table.
//!
//! The Markdown table is the tabular report: one row per endpoint with the columns
//! route, HTTP method, request object and response object.

use crate::report::ApplicationReport;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

const TABLE_HEADER: [&str; 4] = ["Route", "HTTP Method", "Request Object", "Response Object"];

/// Serializes a report to YAML format.
pub fn serialize_yaml(report: &ApplicationReport) -> Result<String> {
    debug!("Serializing report {} to YAML", report.application_name);
    serde_yaml::to_string(report).context("Failed to serialize report to YAML")
}

/// Serializes a report to JSON format with pretty printing.
pub fn serialize_json(report: &ApplicationReport) -> Result<String> {
    debug!("Serializing report {} to JSON", report.application_name);
    serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
}

/// Renders the report rows as a Markdown table under a heading named after the
/// application.
///
/// Cell text is escaped so that examples containing pipes or line breaks stay inside
/// their cell.
pub fn render_markdown_table(report: &ApplicationReport) -> String {
    let mut out = format!("# {}\n\n", report.application_name);
    out.push_str(&table_line(&TABLE_HEADER));
    out.push_str(&table_line(&["---"; 4]));

    for row in report.rows() {
        out.push_str(&table_line(&[
            row.route.as_str(),
            row.http_method.as_str(),
            row.request_example.as_str(),
            row.response_example.as_str(),
        ]));
    }
    out
}

fn table_line(cells: &[&str]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
    format!("| {} |\n", cells.join(" | "))
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}

/// Writes string content to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does. Missing parent
/// directories are created.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
