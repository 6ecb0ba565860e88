//! End-to-end runs
//!
//! ```text
//! validate ─► lock ─► load ledger ─► list remote ─► extract ─► diff
//!                                                              │
//!        exports ◄─ save ledger (once, real runs only) ◄─ reconcile
//! ```

use crate::config::{ExportConfig, SourceConfig, SyncConfig};
use crate::diff::diff;
use crate::error::SyncError;
use crate::reconcile::{reconcile, Operation, ReconcileReport};
use std::path::{Path, PathBuf};
use todosync_extract::{Extraction, Extractor};
use todosync_ledger::{Ledger, LedgerLock, LedgerStore};
use todosync_model::CandidateRecord;
use todosync_remote::RemoteStore;

/// What a sync run did
#[derive(Debug)]
pub struct SyncSummary {
    /// Reconcile outcomes (planned outcomes for dry runs)
    pub report: ReconcileReport,
    /// Candidates extracted this run
    pub candidates: usize,
    /// Files skipped during extraction
    pub skipped_files: usize,
    /// Ledger location
    pub ledger_path: PathBuf,
    /// Exports written
    pub exports: Vec<PathBuf>,
}

impl SyncSummary {
    /// Whether the run was simulated
    #[inline]
    #[must_use]
    pub fn dry_run(&self) -> bool {
        self.report.dry_run
    }

    /// Created (or would-be created) count
    #[inline]
    #[must_use]
    pub fn created(&self) -> usize {
        self.report.created.len()
    }

    /// Updated (or would-be updated) count
    #[inline]
    #[must_use]
    pub fn updated(&self) -> usize {
        self.report.updated.len()
    }

    /// Completed (or would-be completed) count
    #[inline]
    #[must_use]
    pub fn completed(&self) -> usize {
        self.report.completed.len()
    }

    /// Records completed locally because their remote item was already gone
    #[inline]
    #[must_use]
    pub fn retired(&self) -> usize {
        self.report.retired.len()
    }

    /// Failures for `operation`
    #[inline]
    #[must_use]
    pub fn failed(&self, operation: Operation) -> usize {
        self.report.failed(operation)
    }
}

/// One sync of a source tree against a remote store
pub struct SyncRun<'a> {
    config: SyncConfig,
    store: &'a dyn RemoteStore,
}

impl<'a> SyncRun<'a> {
    /// Prepare a run
    #[inline]
    #[must_use]
    pub fn new(config: SyncConfig, store: &'a dyn RemoteStore) -> Self {
        Self { config, store }
    }

    /// Run to completion
    ///
    /// # Errors
    /// - [`SyncError::Config`] before anything is touched
    /// - [`SyncError::Ledger`] if the ledger is locked, corrupt or unwritable
    /// - [`SyncError::List`] if the remote snapshot cannot be fetched
    /// - [`SyncError::Extract`] if the tree cannot be scanned
    /// - [`SyncError::Export`] if an export fails after the ledger was saved
    ///
    /// Per-item remote failures are reported in [`SyncSummary::report`].
    pub async fn execute(self) -> Result<SyncSummary, SyncError> {
        let config = self.config;
        config.validate()?;

        let ledger_path = config.ledger_target();
        let store = LedgerStore::new(&ledger_path);
        let _lock = LedgerLock::acquire(&ledger_path)?;
        let mut ledger = store.load()?;
        tracing::debug!(
            "Loaded ledger {} with {} record(s)",
            ledger_path.display(),
            ledger.len()
        );

        let remote = self.store.list().await.map_err(SyncError::List)?;
        tracing::info!("Fetched {} task(s) from remote", remote.len());

        let extraction = scan(&config.source)?;
        let planned = diff(&extraction.candidates, &remote, &ledger);
        let report = reconcile(&planned, self.store, &mut ledger, config.dry_run).await;

        let mut exports = Vec::new();
        if config.dry_run {
            tracing::info!("Dry run: ledger and exports left untouched");
        } else {
            store.save(&ledger)?;
            let (active, completed) = ledger.status_counts();
            tracing::info!(
                "Saved ledger {} ({} active, {} completed)",
                ledger_path.display(),
                active,
                completed
            );
            exports = export_ledger(&ledger, &config.export, &config.source.dir)?;
        }

        if !report.is_clean() {
            tracing::warn!("{} remote mutation(s) failed", report.failures.len());
        }
        tracing::info!("Sync complete");

        Ok(SyncSummary {
            report,
            candidates: extraction.candidates.len(),
            skipped_files: extraction.skipped.len(),
            ledger_path,
            exports,
        })
    }
}

/// Sync with `config` against `store`
///
/// # Errors
/// See [`SyncRun::execute`].
pub async fn sync(config: SyncConfig, store: &dyn RemoteStore) -> Result<SyncSummary, SyncError> {
    SyncRun::new(config, store).execute().await
}

/// What a standalone export did
#[derive(Debug, Default)]
pub struct ExportSummary {
    /// Candidates extracted
    pub candidates: usize,
    /// Files skipped during extraction
    pub skipped_files: usize,
    /// Exports written
    pub exports: Vec<PathBuf>,
}

/// Extract candidates and export them directly, without ledger or remote
///
/// # Errors
/// [`SyncError::Config`], [`SyncError::Extract`] or [`SyncError::Export`].
pub fn export(source: &SourceConfig, export: &ExportConfig) -> Result<ExportSummary, SyncError> {
    source.validate()?;
    let extraction = scan(source)?;
    tracing::info!("Extracted {} TODO(s) from files", extraction.candidates.len());

    if !export.any() {
        tracing::warn!("No export option specified");
    }
    let exports = export_candidates(&extraction.candidates, export, &source.dir)?;

    Ok(ExportSummary {
        candidates: extraction.candidates.len(),
        skipped_files: extraction.skipped.len(),
        exports,
    })
}

fn scan(source: &SourceConfig) -> Result<Extraction, SyncError> {
    let extraction = Extractor::new()?.extract(&source.dir, &source.extensions)?;
    for skipped in &extraction.skipped {
        tracing::debug!("Skipped {}: {}", skipped.path.display(), skipped.error);
    }
    Ok(extraction)
}

fn export_ledger(
    ledger: &Ledger,
    export: &ExportConfig,
    dir: &Path,
) -> Result<Vec<PathBuf>, SyncError> {
    let mut written = Vec::new();
    if export.json {
        let path = export.json_target(dir);
        todosync_report::export_ledger_json(ledger, &path)?;
        written.push(path);
    }
    if export.markdown {
        let path = export.markdown_target(dir);
        todosync_report::export_ledger_markdown(ledger, &path)?;
        written.push(path);
    }
    Ok(written)
}

fn export_candidates(
    candidates: &[CandidateRecord],
    export: &ExportConfig,
    dir: &Path,
) -> Result<Vec<PathBuf>, SyncError> {
    let mut written = Vec::new();
    if export.json {
        let path = export.json_target(dir);
        todosync_report::export_candidates_json(candidates, &path)?;
        written.push(path);
    }
    if export.markdown {
        let path = export.markdown_target(dir);
        todosync_report::export_candidates_markdown(candidates, &path)?;
        written.push(path);
    }
    Ok(written)
}
