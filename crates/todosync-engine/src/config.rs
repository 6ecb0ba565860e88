//! Run configuration
//!
//! Plain structs with builder-style setters. Paths left unset resolve
//! relative to the source directory.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use todosync_extract::ExtensionSet;

/// File types scanned when none are given
pub const DEFAULT_FILE_TYPES: &str = ".tex";

/// Ledger file name inside the source directory
pub const DEFAULT_LEDGER_FILE: &str = ".todosync-ledger.json";

/// JSON export file name inside the source directory
pub const DEFAULT_JSON_FILE: &str = "todo.json";

/// Markdown export file name inside the source directory
pub const DEFAULT_MARKDOWN_FILE: &str = "README.md";

/// Where to look for markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Root of the scanned tree
    pub dir: PathBuf,
    /// Extensions to scan
    pub extensions: ExtensionSet,
}

impl SourceConfig {
    /// Scan `dir` for the default file types
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extensions: ExtensionSet::parse(DEFAULT_FILE_TYPES),
        }
    }

    /// Set extensions
    #[inline]
    #[must_use]
    pub fn with_extensions(mut self, extensions: ExtensionSet) -> Self {
        self.extensions = extensions;
        self
    }

    /// Check directory and extensions
    ///
    /// # Errors
    /// [`ConfigError::MissingDirectory`] or [`ConfigError::NoExtensions`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dir.is_dir() {
            return Err(ConfigError::MissingDirectory(self.dir.clone()));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        Ok(())
    }
}

/// Optional export targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportConfig {
    /// Write a JSON export
    pub json: bool,
    /// JSON export path, defaults to `<dir>/todo.json`
    pub json_path: Option<PathBuf>,
    /// Write a Markdown export
    pub markdown: bool,
    /// Markdown export path, defaults to `<dir>/README.md`
    pub markdown_path: Option<PathBuf>,
}

impl ExportConfig {
    /// No exports
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable JSON export, optionally at a custom path
    #[inline]
    #[must_use]
    pub fn with_json(mut self, path: Option<PathBuf>) -> Self {
        self.json = true;
        self.json_path = path;
        self
    }

    /// Enable Markdown export, optionally at a custom path
    #[inline]
    #[must_use]
    pub fn with_markdown(mut self, path: Option<PathBuf>) -> Self {
        self.markdown = true;
        self.markdown_path = path;
        self
    }

    /// Whether any export is enabled
    #[inline]
    #[must_use]
    pub fn any(&self) -> bool {
        self.json || self.markdown
    }

    /// Resolved JSON path
    #[must_use]
    pub fn json_target(&self, dir: &Path) -> PathBuf {
        self.json_path
            .clone()
            .unwrap_or_else(|| dir.join(DEFAULT_JSON_FILE))
    }

    /// Resolved Markdown path
    #[must_use]
    pub fn markdown_target(&self, dir: &Path) -> PathBuf {
        self.markdown_path
            .clone()
            .unwrap_or_else(|| dir.join(DEFAULT_MARKDOWN_FILE))
    }
}

/// Full sync run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Source tree
    pub source: SourceConfig,
    /// Ledger path, defaults to `<dir>/.todosync-ledger.json`
    pub ledger_path: Option<PathBuf>,
    /// Compute and report without mutating anything
    pub dry_run: bool,
    /// Exports written after a real run
    pub export: ExportConfig,
}

impl SyncConfig {
    /// Sync `dir` with defaults
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: SourceConfig::new(dir),
            ledger_path: None,
            dry_run: false,
            export: ExportConfig::default(),
        }
    }

    /// Set extensions
    #[inline]
    #[must_use]
    pub fn with_extensions(mut self, extensions: ExtensionSet) -> Self {
        self.source.extensions = extensions;
        self
    }

    /// Set ledger path
    #[inline]
    #[must_use]
    pub fn with_ledger_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ledger_path = Some(path.into());
        self
    }

    /// Set dry-run mode
    #[inline]
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set exports
    #[inline]
    #[must_use]
    pub fn with_export(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }

    /// Resolved ledger path
    #[must_use]
    pub fn ledger_target(&self) -> PathBuf {
        self.ledger_path
            .clone()
            .unwrap_or_else(|| self.source.dir.join(DEFAULT_LEDGER_FILE))
    }

    /// Validate before any I/O
    ///
    /// # Errors
    /// See [`SourceConfig::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.source.validate()
    }
}
