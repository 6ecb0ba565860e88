//! todosync Export Rendering
//!
//! JSON and Markdown views of TODOs. Sync exports render the final ledger;
//! the standalone export renders freshly extracted candidates.
//!
//! ```text
//! Ledger / candidates ──► ReportRow ──► render_markdown ──► README.md
//!          │
//!          └────────────────────────► render_json ──────► todo.json
//! ```

#![warn(unreachable_pub)]

mod error;
mod render;
mod row;

pub use error::{ReportError, ReportResult};
pub use render::{render_json, render_markdown, write_export};
pub use row::ReportRow;

use std::path::Path;
use todosync_ledger::Ledger;
use todosync_model::CandidateRecord;

/// Every ledger record, active and completed, in ledger order
///
/// # Errors
/// See [`render_json`] and [`write_export`].
pub fn export_ledger_json(ledger: &Ledger, path: &Path) -> ReportResult<()> {
    let records: Vec<_> = ledger.iter().collect();
    write_export(path, &render_json(&records)?)
}

/// Active ledger records grouped by category
///
/// # Errors
/// See [`write_export`].
pub fn export_ledger_markdown(ledger: &Ledger, path: &Path) -> ReportResult<()> {
    let rows: Vec<ReportRow> = ledger.active().map(ReportRow::from).collect();
    write_export(path, &render_markdown(&rows))
}

/// Extracted candidates as flat JSON rows
///
/// # Errors
/// See [`render_json`] and [`write_export`].
pub fn export_candidates_json(candidates: &[CandidateRecord], path: &Path) -> ReportResult<()> {
    let rows: Vec<ReportRow> = candidates.iter().map(ReportRow::from).collect();
    write_export(path, &render_json(&rows)?)
}

/// Extracted candidates grouped by category
///
/// # Errors
/// See [`write_export`].
pub fn export_candidates_markdown(
    candidates: &[CandidateRecord],
    path: &Path,
) -> ReportResult<()> {
    let rows: Vec<ReportRow> = candidates.iter().map(ReportRow::from).collect();
    write_export(path, &render_markdown(&rows))
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
