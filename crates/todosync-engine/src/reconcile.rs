//! Apply loop
//!
//! Applies a [`Diff`] against a [`RemoteStore`] one item at a time and
//! mirrors every success into the in-memory [`Ledger`]. Failures are
//! collected, never propagated; the caller saves the ledger once.

use crate::diff::Diff;
use chrono::{DateTime, Utc};
use std::fmt::{self, Display, Formatter};
use todosync_ledger::Ledger;
use todosync_model::{Identity, LedgerRecord, RemoteDraft};
use todosync_remote::{RemoteError, RemoteStore};

/// Remote mutation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// New remote item
    Create,
    /// Rewrite of a linked item
    Update,
    /// Removal of an item whose marker vanished
    Delete,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// A single failed mutation
#[derive(Debug)]
pub struct ItemFailure {
    /// What was attempted
    pub operation: Operation,
    /// Identity it was attempted for
    pub identity: Identity,
    /// Remote error
    pub error: RemoteError,
}

/// Outcome tallies of one reconcile pass
///
/// In dry-run mode the identity lists hold what *would* have been applied
/// and `failures` is always empty.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Whether the pass was simulated
    pub dry_run: bool,
    /// Identities created remotely
    pub created: Vec<Identity>,
    /// Identities updated remotely
    pub updated: Vec<Identity>,
    /// Identities whose remote item was deleted
    pub completed: Vec<Identity>,
    /// Identities completed locally because their remote item was already gone
    pub retired: Vec<Identity>,
    /// Failed mutations in processing order
    pub failures: Vec<ItemFailure>,
}

impl ReconcileReport {
    /// Number of failures for `operation`
    #[must_use]
    pub fn failed(&self, operation: Operation) -> usize {
        self.failures
            .iter()
            .filter(|f| f.operation == operation)
            .count()
    }

    /// Whether every mutation succeeded
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, operation: Operation, identity: &Identity, error: RemoteError) {
        tracing::error!("Failed to {} TODO {}: {}", operation, identity, error);
        self.failures.push(ItemFailure {
            operation,
            identity: identity.clone(),
            error,
        });
    }
}

/// Apply `diff`, stamping ledger changes with the current time
pub async fn reconcile(
    diff: &Diff,
    store: &dyn RemoteStore,
    ledger: &mut Ledger,
    dry_run: bool,
) -> ReconcileReport {
    reconcile_at(diff, store, ledger, dry_run, Utc::now()).await
}

/// Apply `diff`, using `now` for completion times and as the creation time
/// when the remote does not report one
///
/// Creates run first, then updates, then deletes. Retirements touch only
/// the ledger.
pub async fn reconcile_at(
    diff: &Diff,
    store: &dyn RemoteStore,
    ledger: &mut Ledger,
    dry_run: bool,
    now: DateTime<Utc>,
) -> ReconcileReport {
    if dry_run {
        return plan(diff);
    }

    let mut report = ReconcileReport::default();

    for candidate in &diff.to_create {
        match store.create(&RemoteDraft::from_candidate(candidate)).await {
            Ok(task) => {
                tracing::info!("Added TODO {}: {}", candidate.identity, candidate.text);
                let created_at = task.created_time.unwrap_or(now);
                ledger.upsert(LedgerRecord::created(candidate, task.id, created_at));
                report.created.push(candidate.identity.clone());
            }
            Err(e) => report.fail(Operation::Create, &candidate.identity, e),
        }
    }

    for item in &diff.to_update {
        let identity = &item.candidate.identity;
        match store
            .update(&item.remote_id, &RemoteDraft::from_candidate(&item.candidate))
            .await
        {
            Ok(()) => {
                if let Some(record) = ledger.get_mut(identity) {
                    record.refresh_from(&item.candidate);
                    record.reactivate();
                } else {
                    tracing::warn!("Updated TODO {} has no ledger record", identity);
                }
                tracing::info!("Updated TODO {}: {}", identity, item.candidate.text);
                report.updated.push(identity.clone());
            }
            Err(e) => report.fail(Operation::Update, identity, e),
        }
    }

    for item in &diff.to_delete {
        match store.delete(&item.remote.id).await {
            Ok(()) => {
                if let Some(record) = ledger.get_mut(&item.identity) {
                    record.mark_completed(now);
                }
                tracing::info!("Completed TODO {} (remote {})", item.identity, item.remote.id);
                report.completed.push(item.identity.clone());
            }
            Err(e) => report.fail(Operation::Delete, &item.identity, e),
        }
    }

    for identity in &diff.to_retire {
        if let Some(record) = ledger.get_mut(identity) {
            record.mark_completed(now);
            tracing::info!("Completed TODO {} (remote item already gone)", identity);
            report.retired.push(identity.clone());
        }
    }

    report
}

fn plan(diff: &Diff) -> ReconcileReport {
    for candidate in &diff.to_create {
        tracing::info!("Dry run: would add TODO {}: {}", candidate.identity, candidate.text);
    }
    for item in &diff.to_update {
        tracing::info!(
            "Dry run: would update TODO {}: {}",
            item.candidate.identity,
            item.candidate.text
        );
    }
    for item in &diff.to_delete {
        tracing::info!("Dry run: would complete TODO {}", item.identity);
    }
    for identity in &diff.to_retire {
        tracing::info!("Dry run: would retire TODO {}", identity);
    }

    ReconcileReport {
        dry_run: true,
        created: diff.to_create.iter().map(|c| c.identity.clone()).collect(),
        updated: diff
            .to_update
            .iter()
            .map(|u| u.candidate.identity.clone())
            .collect(),
        completed: diff.to_delete.iter().map(|d| d.identity.clone()).collect(),
        retired: diff.to_retire.clone(),
        failures: Vec::new(),
    }
}
