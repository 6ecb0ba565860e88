//! Testing utilities for the todosync workspace
//!
//! Shared fixtures and an in-memory [`RemoteStore`].

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use todosync_ledger::Ledger;
use todosync_model::{
    CandidateRecord, Category, LedgerRecord, RemoteDraft, RemoteId, RemoteRecord,
};
use todosync_remote::{RemoteError, RemoteResult, RemoteStore};

/// Fixed timestamp used by fixtures
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn candidate(file: &str, line: u32, raw: &str) -> CandidateRecord {
    CandidateRecord::from_marker(file, line, raw)
}

/// Active ledger record linked to `remote_id`
pub fn active_record(file: &str, line: u32, raw: &str, remote_id: &str) -> LedgerRecord {
    LedgerRecord::created(&candidate(file, line, raw), RemoteId::new(remote_id), epoch())
}

/// Completed ledger record linked to `remote_id`
pub fn completed_record(file: &str, line: u32, raw: &str, remote_id: &str) -> LedgerRecord {
    let mut record = active_record(file, line, raw, remote_id);
    record.mark_completed(epoch());
    record
}

/// Remote record mirroring `candidate` under `remote_id`
pub fn remote_for(candidate: &CandidateRecord, remote_id: &str) -> RemoteRecord {
    RemoteRecord::new(remote_id, candidate.text.clone()).with_category(&candidate.category)
}

pub fn remote(id: &str, name: &str, category: &str) -> RemoteRecord {
    RemoteRecord::new(id, name).with_category(&Category::normalize(category))
}

pub fn ledger_of(records: Vec<LedgerRecord>) -> Ledger {
    Ledger::from_records(records).unwrap()
}

/// Write `files` (relative path, content) under a fresh temp dir
pub fn source_tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (relative, content) in files {
        write_file(dir.path(), relative, content);
    }
    dir
}

pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// One call observed by [`FakeRemote`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    List,
    Create(RemoteDraft),
    Update(RemoteId, RemoteDraft),
    Delete(RemoteId),
}

#[derive(Debug, Default)]
struct FakeState {
    tasks: Vec<RemoteRecord>,
    calls: Vec<RemoteCall>,
    next_id: u64,
    fail_list: bool,
    fail_names: HashSet<String>,
    fail_ids: HashSet<RemoteId>,
}

/// In-memory remote store
///
/// Assigns ids `fake-1`, `fake-2`, ... and records every call. Failures are
/// injected by task name (create/update) or by remote id (update/delete).
#[derive(Debug, Default)]
pub struct FakeRemote {
    state: Mutex<FakeState>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<RemoteRecord>) -> Self {
        let fake = Self::new();
        fake.state.lock().tasks = tasks;
        fake
    }

    /// Fail every `list` call
    pub fn fail_list(&self) {
        self.state.lock().fail_list = true;
    }

    /// Fail create/update calls whose draft name is `name`
    pub fn fail_name(&self, name: &str) {
        self.state.lock().fail_names.insert(name.to_string());
    }

    /// Fail update/delete calls against `id`
    pub fn fail_id(&self, id: &str) {
        self.state.lock().fail_ids.insert(RemoteId::new(id));
    }

    pub fn tasks(&self) -> Vec<RemoteRecord> {
        self.state.lock().tasks.clone()
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.state.lock().calls.clone()
    }

    /// Calls other than `list`
    pub fn mutation_count(&self) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| !matches!(c, RemoteCall::List))
            .count()
    }

    fn injected(what: &str) -> RemoteError {
        RemoteError::status(500, format!("injected failure: {what}"))
    }
}

#[async_trait]
impl RemoteStore for FakeRemote {
    async fn list(&self) -> RemoteResult<Vec<RemoteRecord>> {
        let mut state = self.state.lock();
        state.calls.push(RemoteCall::List);
        if state.fail_list {
            return Err(Self::injected("list"));
        }
        Ok(state.tasks.clone())
    }

    async fn create(&self, draft: &RemoteDraft) -> RemoteResult<RemoteRecord> {
        let mut state = self.state.lock();
        state.calls.push(RemoteCall::Create(draft.clone()));
        if state.fail_names.contains(&draft.name) {
            return Err(Self::injected(&draft.name));
        }
        state.next_id += 1;
        let mut record = RemoteRecord::new(format!("fake-{}", state.next_id), draft.name.clone());
        record.description = Some(draft.description.clone());
        record.labels = draft.labels.clone();
        record.created_time = Some(epoch());
        state.tasks.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &RemoteId, draft: &RemoteDraft) -> RemoteResult<()> {
        let mut state = self.state.lock();
        state.calls.push(RemoteCall::Update(id.clone(), draft.clone()));
        if state.fail_ids.contains(id) || state.fail_names.contains(&draft.name) {
            return Err(Self::injected(id.as_str()));
        }
        let task = state
            .tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| RemoteError::status(404, "task not found"))?;
        task.name = draft.name.clone();
        task.description = Some(draft.description.clone());
        task.labels = draft.labels.clone();
        Ok(())
    }

    async fn delete(&self, id: &RemoteId) -> RemoteResult<()> {
        let mut state = self.state.lock();
        state.calls.push(RemoteCall::Delete(id.clone()));
        if state.fail_ids.contains(id) {
            return Err(Self::injected(id.as_str()));
        }
        let before = state.tasks.len();
        state.tasks.retain(|t| &t.id != id);
        if state.tasks.len() == before {
            return Err(RemoteError::status(404, "task not found"));
        }
        Ok(())
    }
}
