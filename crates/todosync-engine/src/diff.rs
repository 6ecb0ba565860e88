//! Three-way diff
//!
//! Compares this run's candidates against the remote snapshot, using the
//! ledger as the only link between an identity and a remote id.
//!
//! A candidate is *linked* when its ledger record carries a remote id that
//! is present in the snapshot. Linked candidates can only be updated;
//! unlinked ones are created. Remote items only ever get deleted when a
//! ledger record links them to an identity that is no longer present.
//! Active records whose marker and remote item are both gone are retired
//! locally, without any remote call.

use std::collections::{HashMap, HashSet};
use todosync_ledger::Ledger;
use todosync_model::{CandidateRecord, Identity, RemoteId, RemoteRecord};

/// Linked candidate whose remote copy needs rewriting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateItem {
    /// Local content to push
    pub candidate: CandidateRecord,
    /// Remote item to overwrite
    pub remote_id: RemoteId,
}

/// Remote item whose marker disappeared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteItem {
    /// Identity the ledger links to the remote item
    pub identity: Identity,
    /// Remote item to delete
    pub remote: RemoteRecord,
}

/// Planned remote mutations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Candidates to create, in candidate order
    pub to_create: Vec<CandidateRecord>,
    /// Linked candidates to update, in candidate order
    pub to_update: Vec<UpdateItem>,
    /// Remote items to delete, in remote order
    pub to_delete: Vec<DeleteItem>,
    /// Active identities with neither a marker nor a remote item, in ledger
    /// order
    pub to_retire: Vec<Identity>,
}

impl Diff {
    /// Whether nothing needs to change
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty()
            && self.to_update.is_empty()
            && self.to_delete.is_empty()
            && self.to_retire.is_empty()
    }

    /// Total number of planned mutations
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len() + self.to_retire.len()
    }
}

/// Compute the mutations that bring the remote in line with `candidates`
///
/// Pure and deterministic. A completed ledger record whose remote item is
/// still listed counts as linked and is always scheduled for update so the
/// reconciler can reactivate it.
#[must_use]
pub fn diff(candidates: &[CandidateRecord], remote: &[RemoteRecord], ledger: &Ledger) -> Diff {
    let remote_by_id: HashMap<&RemoteId, &RemoteRecord> =
        remote.iter().map(|r| (&r.id, r)).collect();

    let mut identity_by_remote: HashMap<&RemoteId, &Identity> = HashMap::new();
    for record in ledger.iter() {
        if let Some(remote_id) = record.remote_id.as_ref() {
            identity_by_remote
                .entry(remote_id)
                .or_insert(&record.identity);
        }
    }

    let mut result = Diff::default();
    let mut current: HashSet<&Identity> = HashSet::with_capacity(candidates.len());

    for candidate in candidates {
        if !current.insert(&candidate.identity) {
            tracing::warn!("Duplicate identity {} in extraction, ignoring", candidate.identity);
            continue;
        }

        let record = ledger.get(&candidate.identity);
        let linked = record.and_then(|r| {
            let remote_id = r.remote_id.as_ref()?;
            remote_by_id.get(remote_id).map(|task| (r, *task))
        });

        match linked {
            Some((record, task)) => {
                if task.differs_from(candidate) || !record.is_active() {
                    result.to_update.push(UpdateItem {
                        candidate: candidate.clone(),
                        remote_id: task.id.clone(),
                    });
                }
            }
            None => result.to_create.push(candidate.clone()),
        }
    }

    for task in remote {
        let Some(identity) = identity_by_remote.get(&task.id) else {
            continue;
        };
        if !current.contains(*identity) {
            result.to_delete.push(DeleteItem {
                identity: (*identity).clone(),
                remote: task.clone(),
            });
        }
    }

    for record in ledger.active() {
        let remote_gone = record
            .remote_id
            .as_ref()
            .is_some_and(|id| !remote_by_id.contains_key(id));
        if remote_gone && !current.contains(&record.identity) {
            result.to_retire.push(record.identity.clone());
        }
    }

    tracing::debug!(
        "Diff: {} to create, {} to update, {} to delete, {} to retire",
        result.to_create.len(),
        result.to_update.len(),
        result.to_delete.len(),
        result.to_retire.len()
    );
    result
}
