//! Ledger persistence
//!
//! The ledger is loaded wholesale at run start and replaced wholesale at run
//! end. Writes go to a temp file in the target directory, are synced, then
//! renamed over the previous document.

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{Ledger, LedgerDocument};
use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Ledger store bound to one document path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Create store for path
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Document path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger; a missing file yields an empty ledger
    ///
    /// # Errors
    /// [`LedgerError::CorruptLedger`] if the file exists but cannot be read,
    /// parsed, or holds inconsistent records.
    pub fn load(&self) -> LedgerResult<Ledger> {
        load(&self.path)
    }

    /// Atomically replace the on-disk ledger
    ///
    /// # Errors
    /// [`LedgerError::Persistence`] on any I/O failure; the previous
    /// document is left untouched.
    pub fn save(&self, ledger: &Ledger) -> LedgerResult<()> {
        save(ledger, &self.path)
    }
}

/// Load the ledger at `path`
///
/// # Errors
/// See [`LedgerStore::load`].
pub fn load(path: &Path) -> LedgerResult<Ledger> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("No ledger at {}, starting empty", path.display());
            return Ok(Ledger::new());
        }
        Err(e) => return Err(LedgerError::corrupt(path, e)),
    };

    let document: LedgerDocument =
        serde_json::from_slice(&bytes).map_err(|e| LedgerError::corrupt(path, e))?;
    let ledger =
        Ledger::from_records(document.todos).map_err(|e| LedgerError::corrupt(path, e))?;

    tracing::debug!("Loaded {} ledger record(s) from {}", ledger.len(), path.display());
    Ok(ledger)
}

/// Save `ledger` to `path` with write-to-temp-then-rename
///
/// # Errors
/// See [`LedgerStore::save`].
pub fn save(ledger: &Ledger, path: &Path) -> LedgerResult<()> {
    let bytes = to_json_bytes(ledger)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| LedgerError::persistence(path, e))?;
    tmp.write_all(&bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| LedgerError::persistence(path, e))?;
    tmp.persist(path)
        .map_err(|e| LedgerError::persistence(path, e.error))?;

    tracing::debug!("Saved {} ledger record(s) to {}", ledger.len(), path.display());
    Ok(())
}

/// Serialized form of the ledger, as written by [`save`]
///
/// Four-space indented JSON with a trailing newline.
///
/// # Errors
/// [`LedgerError::Persistence`] if serialization fails.
pub fn to_json_bytes(ledger: &Ledger) -> LedgerResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    ledger
        .to_document()
        .serialize(&mut serializer)
        .map_err(|e| LedgerError::persistence(PathBuf::new(), std::io::Error::other(e)))?;
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use todosync_model::{CandidateRecord, LedgerRecord, RemoteId};

    fn sample_ledger(n: u32) -> Ledger {
        let mut ledger = Ledger::new();
        for line in 1..=n {
            let candidate = CandidateRecord::from_marker("notes.tex", line, "bug: item");
            let mut record = LedgerRecord::created(
                &candidate,
                RemoteId::new(format!("task-{line}")),
                Utc.timestamp_opt(1_700_000_000 + i64::from(line), 0).unwrap(),
            );
            if line % 3 == 0 {
                record.mark_completed(Utc.timestamp_opt(1_800_000_000, 0).unwrap());
            }
            ledger.upsert(record);
        }
        ledger
    }

    #[test]
    fn missing_file_is_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = load(&dir.path().join("absent.json")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn malformed_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let result = load(&path);
        assert!(matches!(result, Err(LedgerError::CorruptLedger { .. })));
    }

    #[test]
    fn wrong_shape_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, br#"{"todos": [{"id": "a.tex:1"}]}"#).unwrap();

        assert!(matches!(load(&path), Err(LedgerError::CorruptLedger { .. })));
    }

    #[test]
    fn directory_in_place_of_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load(dir.path()), Err(LedgerError::CorruptLedger { .. })));
    }

    #[test]
    fn roundtrip_preserves_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("ledger.json"));

        let ledger = sample_ledger(12);
        store.save(&ledger).unwrap();
        assert_eq!(store.load().unwrap(), ledger);
    }

    #[test]
    fn roundtrip_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("ledger.json"));

        store.save(&Ledger::new()).unwrap();
        assert!(store.load().unwrap().is_empty());
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "{\n    \"todos\": []\n}\n");
    }

    #[test]
    fn reserializing_loaded_document_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        save(&sample_ledger(5), &path).unwrap();

        let before = std::fs::read(&path).unwrap();
        let after = to_json_bytes(&load(&path).unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn save_overwrites_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = LedgerStore::new(dir.path().join("ledger.json"));

        store.save(&sample_ledger(3)).unwrap();
        store.save(&sample_ledger(1)).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn failed_save_leaves_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        save(&sample_ledger(2), &path).unwrap();

        // The target's parent is a file, so no temp file can be created next to it.
        let blocked = path.join("nested.json");
        let result = save(&sample_ledger(4), &blocked);
        assert!(matches!(result, Err(LedgerError::Persistence { .. })));

        assert_eq!(load(&path).unwrap().len(), 2);
    }

    #[test]
    fn loads_document_written_by_hand() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(
            &path,
            br#"{
                "todos": [
                    {
                        "id": "f.tex:3",
                        "category": "BUG",
                        "text": "fix X",
                        "file": "f.tex",
                        "line": 3,
                        "status": "completed",
                        "created_at": "2024-01-01T00:00:00Z",
                        "completed_at": "2024-02-01T00:00:00Z",
                        "api_id": "task-1"
                    }
                ]
            }"#,
        )
        .unwrap();

        let ledger = load(&path).unwrap();
        assert_eq!(ledger.status_counts(), (0, 1));
    }
}
