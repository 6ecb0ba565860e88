//! In-memory ledger
//!
//! Ordered mapping from [`Identity`] to [`LedgerRecord`]. Insertion order is
//! the persisted order, so a load/save cycle reproduces the document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use todosync_model::{Identity, LedgerRecord, ModelError, RecordStatus};

/// Durable identity → state mapping for one source tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: IndexMap<Identity, LedgerRecord>,
}

impl Ledger {
    /// Create empty ledger
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from records, checking every record invariant
    ///
    /// # Errors
    /// - [`ModelError::DuplicateIdentity`] if an identity repeats
    /// - [`ModelError::InvariantViolation`] if a record is inconsistent
    pub fn from_records(records: Vec<LedgerRecord>) -> Result<Self, ModelError> {
        let mut map = IndexMap::with_capacity(records.len());
        for record in records {
            record.check_invariants()?;
            let identity = record.identity.clone();
            if map.insert(identity.clone(), record).is_some() {
                return Err(ModelError::DuplicateIdentity(identity));
            }
        }
        Ok(Self { records: map })
    }

    /// Lookup by identity
    #[inline]
    #[must_use]
    pub fn get(&self, identity: &Identity) -> Option<&LedgerRecord> {
        self.records.get(identity)
    }

    /// Mutable lookup by identity
    #[inline]
    pub fn get_mut(&mut self, identity: &Identity) -> Option<&mut LedgerRecord> {
        self.records.get_mut(identity)
    }

    /// Insert or replace the record for its identity
    ///
    /// A replaced record keeps its original position.
    pub fn upsert(&mut self, record: LedgerRecord) {
        self.records.insert(record.identity.clone(), record);
    }

    /// Records in persisted order
    pub fn iter(&self) -> impl Iterator<Item = &LedgerRecord> {
        self.records.values()
    }

    /// Active records in persisted order
    pub fn active(&self) -> impl Iterator<Item = &LedgerRecord> {
        self.iter().filter(|r| r.status == RecordStatus::Active)
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count of records per status: (active, completed)
    #[must_use]
    pub fn status_counts(&self) -> (usize, usize) {
        self.iter().fold((0, 0), |(active, completed), r| match r.status {
            RecordStatus::Active => (active + 1, completed),
            RecordStatus::Completed => (active, completed + 1),
        })
    }

    pub(crate) fn to_document(&self) -> LedgerDocument {
        LedgerDocument {
            todos: self.records.values().cloned().collect(),
        }
    }
}

/// Persisted layout: `{"todos": [...]}`
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct LedgerDocument {
    pub(crate) todos: Vec<LedgerRecord>,
}
