//! Diff determinism and convergence

use proptest::prelude::*;
use todosync_engine::diff;
use todosync_ledger::Ledger;
use todosync_model::{CandidateRecord, LedgerRecord, RemoteRecord};
use todosync_test_utils::{epoch, remote_for};

fn candidates() -> impl Strategy<Value = Vec<CandidateRecord>> {
    prop::collection::btree_map(1u32..200, "(BUG: |DOC: )?[a-z]{1,12}", 0..20).prop_map(|lines| {
        lines
            .into_iter()
            .map(|(line, raw)| CandidateRecord::from_marker("paper.tex", line, &raw))
            .collect()
    })
}

/// Ledger and remote snapshot as they would be after a fully successful run
fn converged(candidates: &[CandidateRecord]) -> (Ledger, Vec<RemoteRecord>) {
    let mut ledger = Ledger::new();
    let mut remote = Vec::new();
    for (n, candidate) in candidates.iter().enumerate() {
        let task = remote_for(candidate, &format!("r{n}"));
        ledger.upsert(LedgerRecord::created(candidate, task.id.clone(), epoch()));
        remote.push(task);
    }
    (ledger, remote)
}

proptest! {
    #[test]
    fn diff_is_deterministic(
        local in candidates(),
        previous in candidates(),
    ) {
        let (ledger, remote) = converged(&previous);
        prop_assert_eq!(diff(&local, &remote, &ledger), diff(&local, &remote, &ledger));
    }

    #[test]
    fn converged_state_diffs_empty(local in candidates()) {
        let (ledger, remote) = converged(&local);
        prop_assert!(diff(&local, &remote, &ledger).is_empty());
    }

    #[test]
    fn empty_ledger_creates_every_candidate(local in candidates()) {
        let result = diff(&local, &[], &Ledger::new());
        prop_assert_eq!(result.to_create, local);
        prop_assert!(result.to_delete.is_empty());
    }

    #[test]
    fn no_candidates_deletes_every_linked_item(previous in candidates()) {
        let (ledger, remote) = converged(&previous);
        let result = diff(&[], &remote, &ledger);
        prop_assert_eq!(result.to_delete.len(), remote.len());
        prop_assert!(result.to_create.is_empty());
    }
}
