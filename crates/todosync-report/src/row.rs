//! Flat export row

use serde::Serialize;
use todosync_model::{CandidateRecord, LedgerRecord};

/// One TODO as it appears in an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// `file:line` identity
    pub id: String,
    /// Normalized category
    pub category: String,
    /// Marker description
    pub text: String,
    /// Source file
    pub file: String,
    /// 1-based source line
    pub line: u32,
}

impl From<&CandidateRecord> for ReportRow {
    fn from(candidate: &CandidateRecord) -> Self {
        Self {
            id: candidate.identity.to_string(),
            category: candidate.category.to_string(),
            text: candidate.text.clone(),
            file: candidate.source_file.clone(),
            line: candidate.source_line,
        }
    }
}

impl From<&LedgerRecord> for ReportRow {
    fn from(record: &LedgerRecord) -> Self {
        Self {
            id: record.identity.to_string(),
            category: record.category.to_string(),
            text: record.text.clone(),
            file: record.source_file.clone(),
            line: record.source_line,
        }
    }
}
