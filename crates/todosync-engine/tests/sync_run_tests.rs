//! Full sync runs over temp trees and an in-memory remote

use pretty_assertions::assert_eq;
use todosync_engine::{
    export, sync, ConfigError, ExportConfig, Operation, SourceConfig, SyncConfig, SyncError,
};
use todosync_extract::ExtensionSet;
use todosync_ledger::{lock_path_for, LedgerError, LedgerLock, LedgerStore};
use todosync_model::{Identity, RecordStatus, RemoteId};
use todosync_remote::RemoteStore;
use todosync_test_utils::{remote, source_tree, write_file, FakeRemote, RemoteCall};

const PAPER: &str = "\\section{Intro}\n% TODO BUG: fix X\nbody\n% TODO tighten bound\n";

fn config_for(dir: &std::path::Path) -> SyncConfig {
    SyncConfig::new(dir)
}

#[tokio::test]
async fn first_run_creates_and_persists() {
    let tree = source_tree(&[("paper.tex", PAPER)]);
    let fake = FakeRemote::new();

    let summary = sync(config_for(tree.path()), &fake).await.unwrap();
    assert_eq!(summary.created(), 2);
    assert_eq!(summary.candidates, 2);
    assert!(summary.report.is_clean());

    let ledger = LedgerStore::new(&summary.ledger_path).load().unwrap();
    assert_eq!(ledger.len(), 2);
    assert!(ledger.iter().all(|r| r.is_active() && r.remote_id.is_some()));
    assert!(!lock_path_for(&summary.ledger_path).exists());
}

#[tokio::test]
async fn second_run_without_changes_is_idempotent() {
    let tree = source_tree(&[("paper.tex", PAPER)]);
    let fake = FakeRemote::new();
    sync(config_for(tree.path()), &fake).await.unwrap();
    let mutations = fake.mutation_count();

    let summary = sync(config_for(tree.path()), &fake).await.unwrap();
    assert_eq!(summary.created() + summary.updated() + summary.completed(), 0);
    assert_eq!(fake.mutation_count(), mutations);
}

#[tokio::test]
async fn removed_marker_completes_and_edited_marker_updates() {
    let tree = source_tree(&[("paper.tex", PAPER)]);
    let fake = FakeRemote::new();
    sync(config_for(tree.path()), &fake).await.unwrap();

    write_file(
        tree.path(),
        "paper.tex",
        "\\section{Intro}\n% TODO BUG: fix X for real\nbody\nno marker here\n",
    );
    let summary = sync(config_for(tree.path()), &fake).await.unwrap();
    assert_eq!(summary.updated(), 1);
    assert_eq!(summary.completed(), 1);

    let ledger = LedgerStore::new(&summary.ledger_path).load().unwrap();
    let file = tree.path().join("paper.tex");
    let file = file.to_string_lossy();
    let edited = ledger.get(&Identity::from_location(&file, 2)).unwrap();
    assert_eq!(edited.text, "fix X for real");
    let gone = ledger.get(&Identity::from_location(&file, 4)).unwrap();
    assert_eq!(gone.status, RecordStatus::Completed);
    assert!(gone.completed_at.is_some());
    assert_eq!(fake.tasks().len(), 1);
}

#[tokio::test]
async fn dry_run_leaves_disk_and_remote_untouched() {
    let tree = source_tree(&[("paper.tex", PAPER)]);
    let fake = FakeRemote::new();
    let config = config_for(tree.path())
        .with_dry_run(true)
        .with_export(ExportConfig::new().with_json(None).with_markdown(None));

    let summary = sync(config, &fake).await.unwrap();
    assert!(summary.dry_run());
    assert_eq!(summary.created(), 2);
    assert_eq!(fake.calls(), vec![RemoteCall::List]);
    assert!(!summary.ledger_path.exists());
    assert!(summary.exports.is_empty());
    assert!(!tree.path().join("todo.json").exists());
}

#[tokio::test]
async fn partial_failure_still_saves_successes() {
    let tree = source_tree(&[(
        "a.tex",
        "% TODO first\n% TODO second\n% TODO third\n",
    )]);
    let fake = FakeRemote::new();
    fake.fail_name("second");

    let summary = sync(config_for(tree.path()), &fake).await.unwrap();
    assert_eq!(summary.created(), 2);
    assert_eq!(summary.failed(Operation::Create), 1);

    let ledger = LedgerStore::new(&summary.ledger_path).load().unwrap();
    let texts: Vec<&str> = ledger.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "third"]);
}

#[tokio::test]
async fn list_failure_aborts_before_mutation() {
    let tree = source_tree(&[("paper.tex", PAPER)]);
    let fake = FakeRemote::new();
    fake.fail_list();

    let result = sync(config_for(tree.path()), &fake).await;
    assert!(matches!(result, Err(SyncError::List(_))));
    assert_eq!(fake.mutation_count(), 0);
    assert!(!tree.path().join(todosync_engine::DEFAULT_LEDGER_FILE).exists());
}

#[tokio::test]
async fn corrupt_ledger_aborts_before_remote() {
    let tree = source_tree(&[("paper.tex", PAPER), (".todosync-ledger.json", "{not json")]);
    let fake = FakeRemote::new();

    let result = sync(config_for(tree.path()), &fake).await;
    assert!(matches!(
        result,
        Err(SyncError::Ledger(LedgerError::CorruptLedger { .. }))
    ));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn held_lock_rejects_second_run() {
    let tree = source_tree(&[("paper.tex", PAPER)]);
    let config = config_for(tree.path());
    let _held = LedgerLock::acquire(&config.ledger_target()).unwrap();
    let fake = FakeRemote::new();

    let result = sync(config, &fake).await;
    assert!(matches!(
        result,
        Err(SyncError::Ledger(LedgerError::Locked { .. }))
    ));
    assert!(fake.calls().is_empty());
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn lock_left_by_dead_run_does_not_block() {
    let tree = source_tree(&[("paper.tex", PAPER)]);
    let config = config_for(tree.path());
    // above the default pid_max, never a live process
    std::fs::write(lock_path_for(&config.ledger_target()), "4194305\n").unwrap();
    let fake = FakeRemote::new();

    let summary = sync(config, &fake).await.unwrap();
    assert_eq!(summary.created(), 2);
    assert!(!lock_path_for(&summary.ledger_path).exists());
}

#[tokio::test]
async fn marker_and_remote_both_gone_completes_record() {
    let tree = source_tree(&[("paper.tex", "% TODO BUG: fix X\n")]);
    let fake = FakeRemote::new();
    let first = sync(config_for(tree.path()), &fake).await.unwrap();
    assert_eq!(first.created(), 1);

    fake.delete(&RemoteId::new("fake-1")).await.unwrap();
    write_file(tree.path(), "paper.tex", "nothing left\n");
    let config =
        config_for(tree.path()).with_export(ExportConfig::new().with_markdown(None));
    let summary = sync(config, &fake).await.unwrap();

    assert_eq!(summary.retired(), 1);
    assert_eq!(summary.completed(), 0);
    let ledger = LedgerStore::new(&summary.ledger_path).load().unwrap();
    assert_eq!(ledger.status_counts(), (0, 1));
    let record = ledger.iter().next().unwrap();
    assert_eq!(record.remote_id, Some(RemoteId::new("fake-1")));
    let markdown = std::fs::read_to_string(tree.path().join("README.md")).unwrap();
    assert!(!markdown.contains("fix X"));
}

#[tokio::test]
async fn missing_directory_is_config_error() {
    let fake = FakeRemote::new();
    let result = sync(SyncConfig::new("/definitely/not/here"), &fake).await;
    assert!(matches!(
        result,
        Err(SyncError::Config(ConfigError::MissingDirectory(_)))
    ));
}

#[tokio::test]
async fn foreign_remote_tasks_survive() {
    let tree = source_tree(&[("paper.tex", PAPER)]);
    let fake = FakeRemote::with_tasks(vec![remote("foreign", "not ours", "OPS")]);

    sync(config_for(tree.path()), &fake).await.unwrap();
    assert!(fake.tasks().iter().any(|t| t.id.as_str() == "foreign"));
}

#[tokio::test]
async fn real_run_writes_exports_from_ledger() {
    let tree = source_tree(&[("paper.tex", PAPER)]);
    let fake = FakeRemote::new();
    let config = config_for(tree.path())
        .with_export(ExportConfig::new().with_json(None).with_markdown(None));

    let summary = sync(config, &fake).await.unwrap();
    assert_eq!(summary.exports.len(), 2);
    let markdown = std::fs::read_to_string(tree.path().join("README.md")).unwrap();
    assert!(markdown.contains("### BUG"));
    assert!(markdown.contains("### UNCATEGORIZED"));
    let json = std::fs::read_to_string(tree.path().join("todo.json")).unwrap();
    assert!(json.contains("\"api_id\": \"fake-1\""));
}

#[test]
fn standalone_export_needs_no_remote() {
    let tree = source_tree(&[("paper.tex", PAPER), ("notes.py", "# TODO DOC: cite\n")]);
    let out = tempfile::tempdir().unwrap();
    let source = SourceConfig::new(tree.path()).with_extensions(ExtensionSet::parse(".tex,.py"));
    let targets = ExportConfig::new()
        .with_json(Some(out.path().join("todo.json")))
        .with_markdown(Some(out.path().join("TODO.md")));

    let summary = export(&source, &targets).unwrap();
    assert_eq!(summary.candidates, 3);
    let markdown = std::fs::read_to_string(out.path().join("TODO.md")).unwrap();
    assert!(markdown.contains("| cite |"));
}
