use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use todosync_ledger::{load, save, to_json_bytes, Ledger};
use todosync_model::{CandidateRecord, LedgerRecord, RemoteId};

fn arb_record() -> impl Strategy<Value = (String, u32, String, String, i64, Option<i64>)> {
    (
        "[a-z]{1,8}/[a-z]{1,8}\\.(tex|py|md)",
        1u32..5_000,
        "[A-Za-z]{0,6}",
        "[ -~]{0,40}",
        0i64..2_000_000_000,
        proptest::option::of(0i64..2_000_000_000),
    )
}

fn build_ledger(entries: Vec<(String, u32, String, String, i64, Option<i64>)>) -> Ledger {
    let mut ledger = Ledger::new();
    for (idx, (file, line, category, text, created, completed)) in entries.into_iter().enumerate() {
        let candidate = CandidateRecord::from_marker(file, line, &format!("{category}: {text}"));
        let mut record = LedgerRecord::created(
            &candidate,
            RemoteId::new(format!("task-{idx}")),
            Utc.timestamp_opt(created, 0).unwrap(),
        );
        if let Some(completed) = completed {
            record.mark_completed(Utc.timestamp_opt(completed, 0).unwrap());
        }
        ledger.upsert(record);
    }
    ledger
}

proptest! {
    #[test]
    fn prop_load_after_save_is_identity(entries in proptest::collection::vec(arb_record(), 0..40)) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let ledger = build_ledger(entries);

        save(&ledger, &path).unwrap();
        let loaded = load(&path).unwrap();
        prop_assert_eq!(&loaded, &ledger);
        prop_assert_eq!(to_json_bytes(&loaded).unwrap(), std::fs::read(&path).unwrap());
    }
}

#[test]
fn large_ledger_roundtrip() {
    let entries = (0..5_000u32)
        .map(|i| {
            let completed = (i % 7 == 0).then_some(1_900_000_000);
            (format!("src/file{}.tex", i % 50), i + 1, "bug".to_string(), format!("item {i}"), 1_700_000_000, completed)
        })
        .collect();
    let ledger = build_ledger(entries);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    save(&ledger, &path).unwrap();
    assert_eq!(load(&path).unwrap(), ledger);
}
