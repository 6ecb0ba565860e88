//! Export rendering
//!
//! Rendering is pure; [`write_export`] is the only function touching disk.

use crate::error::{ReportError, ReportResult};
use crate::row::ReportRow;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Pretty JSON array with four-space indentation and a trailing newline
///
/// # Errors
/// [`ReportError::Json`] if an item fails to serialize, or
/// [`ReportError::Encoding`] if the output is not UTF-8.
pub fn render_json<T: Serialize>(items: &[T]) -> ReportResult<String> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    items.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(String::from_utf8(out)?)
}

/// One `### CATEGORY` table per category, categories sorted
///
/// Rows keep their input order within a category.
#[must_use]
pub fn render_markdown(rows: &[ReportRow]) -> String {
    let mut grouped: BTreeMap<&str, Vec<&ReportRow>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.category.as_str()).or_default().push(row);
    }

    let mut out = String::new();
    for (category, rows) in grouped {
        out.push_str(&format!("### {category}\n\n"));
        out.push_str("| ID | Text | File | Line |\n");
        out.push_str("|----|------|------|------|\n");
        for row in rows {
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                escape_cell(&row.id),
                escape_cell(&row.text),
                escape_cell(&row.file),
                row.line
            ));
        }
        out.push('\n');
    }
    out
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

/// Write rendered export to `path`
///
/// # Errors
/// [`ReportError::Io`] if the file cannot be written.
pub fn write_export(path: &Path, contents: &str) -> ReportResult<()> {
    std::fs::write(path, contents).map_err(|e| ReportError::io_error(path, e))?;
    tracing::info!("Exported TODO(s) to {}", path.display());
    Ok(())
}
