//! Record shapes
//!
//! - [`CandidateRecord`]: a marker extracted this run, never persisted
//! - [`LedgerRecord`]: the durable per-identity reconciliation state
//! - [`RemoteRecord`]: read-only projection of a remote task
//! - [`RemoteDraft`]: the payload sent when creating or updating a task

use crate::error::ModelError;
use crate::identity::{split_marker, Category, Identity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A marker extracted from a source file during the current run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    /// `file:line` identity
    pub identity: Identity,
    /// Normalized category
    pub category: Category,
    /// Trimmed description
    pub text: String,
    /// File the marker was found in
    pub source_file: String,
    /// 1-based line number
    pub source_line: u32,
}

impl CandidateRecord {
    /// Build a candidate from the raw text following the marker
    #[must_use]
    pub fn from_marker(source_file: impl Into<String>, source_line: u32, raw: &str) -> Self {
        let source_file = source_file.into();
        let marker = split_marker(raw);
        Self {
            identity: Identity::from_location(&source_file, source_line),
            category: marker.category,
            text: marker.text,
            source_file,
            source_line,
        }
    }
}

/// Reconciliation status of a ledger record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Present locally and linked to a live remote item
    Active,
    /// Marker disappeared and the remote item was deleted
    Completed,
}

impl RecordStatus {
    /// Lowercase name as persisted
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl Display for RecordStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier assigned by the remote store
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(String);

impl RemoteId {
    /// Wrap a remote identifier
    #[inline]
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// String view
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RemoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RemoteId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Durable state for one identity
///
/// # Invariants
/// - `completed_at` is set iff `status == Completed`
/// - `remote_id` is set iff the record was created remotely at least once
///
/// Field names follow the persisted ledger layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Primary key
    #[serde(rename = "id")]
    pub identity: Identity,
    /// Last known category
    pub category: Category,
    /// Last known description
    pub text: String,
    /// Last known source file
    #[serde(rename = "file")]
    pub source_file: String,
    /// Last known source line
    #[serde(rename = "line")]
    pub source_line: u32,
    /// Reconciliation status
    pub status: RecordStatus,
    /// First observation (or remote creation) time
    pub created_at: DateTime<Utc>,
    /// Completion time, only for completed records
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Remote linkage
    #[serde(rename = "api_id", default)]
    pub remote_id: Option<RemoteId>,
}

impl LedgerRecord {
    /// New active record for a candidate that was just created remotely
    #[must_use]
    pub fn created(
        candidate: &CandidateRecord,
        remote_id: RemoteId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identity: candidate.identity.clone(),
            category: candidate.category.clone(),
            text: candidate.text.clone(),
            source_file: candidate.source_file.clone(),
            source_line: candidate.source_line,
            status: RecordStatus::Active,
            created_at,
            completed_at: None,
            remote_id: Some(remote_id),
        }
    }

    /// Whether the record is active
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == RecordStatus::Active
    }

    /// Mirror the candidate's content
    pub fn refresh_from(&mut self, candidate: &CandidateRecord) {
        self.category = candidate.category.clone();
        self.text = candidate.text.clone();
        self.source_file = candidate.source_file.clone();
        self.source_line = candidate.source_line;
    }

    /// Transition to `Active`, clearing the completion time
    pub fn reactivate(&mut self) {
        self.status = RecordStatus::Active;
        self.completed_at = None;
    }

    /// Transition to `Completed`; the remote linkage is kept for audit
    ///
    /// An already completed record keeps its original completion time.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        if self.status == RecordStatus::Completed {
            return;
        }
        self.status = RecordStatus::Completed;
        self.completed_at = Some(at);
    }

    /// Check the record invariants
    ///
    /// # Errors
    /// Returns [`ModelError::InvariantViolation`] describing the first broken
    /// invariant.
    pub fn check_invariants(&self) -> Result<(), ModelError> {
        match (self.status, self.completed_at.is_some()) {
            (RecordStatus::Completed, false) => {
                return Err(ModelError::invariant(
                    &self.identity,
                    "completed record without completed_at",
                ))
            }
            (RecordStatus::Active, true) => {
                return Err(ModelError::invariant(
                    &self.identity,
                    "active record with completed_at",
                ))
            }
            _ => {}
        }
        if self.remote_id.is_none() {
            return Err(ModelError::invariant(&self.identity, "record without api_id"));
        }
        Ok(())
    }
}

/// A task as currently held by the remote store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRecord {
    /// Remote identifier
    pub id: RemoteId,
    /// Task name (mirrors the candidate text)
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Labels; the first one carries the category
    pub labels: Vec<String>,
    /// Workflow status name, if reported
    pub status: Option<String>,
    /// Whether the remote considers the task done
    pub completed: bool,
    /// Remote creation time, if reported
    pub created_time: Option<DateTime<Utc>>,
}

impl RemoteRecord {
    /// Minimal record with just an id and a name
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: RemoteId::new(id),
            name: name.into(),
            description: None,
            labels: Vec::new(),
            status: None,
            completed: false,
            created_time: None,
        }
    }

    /// Attach a category label
    #[must_use]
    pub fn with_category(mut self, category: &Category) -> Self {
        self.labels = vec![category.as_str().to_string()];
        self
    }

    /// Category carried by the first label
    #[must_use]
    pub fn category(&self) -> Category {
        self.labels
            .first()
            .map_or_else(Category::uncategorized, |label| Category::normalize(label))
    }

    /// Whether the candidate's content differs from this record
    #[must_use]
    pub fn differs_from(&self, candidate: &CandidateRecord) -> bool {
        self.name != candidate.text || self.category() != candidate.category
    }
}

/// Payload for remote create and update calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDraft {
    /// Task name
    pub name: String,
    /// Provenance description
    pub description: String,
    /// Category labels
    pub labels: Vec<String>,
}

impl RemoteDraft {
    /// Draft carrying the candidate's content and provenance
    #[must_use]
    pub fn from_candidate(candidate: &CandidateRecord) -> Self {
        Self {
            name: candidate.text.clone(),
            description: format!(
                "File: {}, Line: {}",
                candidate.source_file, candidate.source_line
            ),
            labels: vec![candidate.category.as_str().to_string()],
        }
    }
}
