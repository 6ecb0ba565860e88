//! Directory scanning
//!
//! Walks a tree in file-name order, reads every file whose extension is in
//! the [`ExtensionSet`], and turns marker lines into [`CandidateRecord`]s.
//! Unreadable files are skipped and reported, never fatal.

use crate::error::ExtractError;
use crate::syntax::{CommentSyntax, MarkerPatterns};
use std::path::{Path, PathBuf};
use todosync_model::CandidateRecord;
use walkdir::WalkDir;

/// Lowercase extensions without the leading dot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionSet {
    extensions: Vec<String>,
}

impl ExtensionSet {
    /// Build from extensions with or without a leading dot
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for ext in extensions {
            let ext = ext.as_ref().trim().trim_start_matches('.').to_lowercase();
            if !ext.is_empty() && !set.extensions.contains(&ext) {
                set.extensions.push(ext);
            }
        }
        set
    }

    /// Parse a comma-separated list such as `.tex,.py,md`
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Matching extension of `path`, if any
    #[must_use]
    pub fn matches(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        self.extensions
            .iter()
            .find(|candidate| **candidate == ext)
            .map(String::as_str)
    }

    /// Extensions in insertion order
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.extensions
    }

    /// Whether the set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

/// A file the scan could not read
#[derive(Debug)]
pub struct SkippedFile {
    /// Path that failed
    pub path: PathBuf,
    /// Why it failed
    pub error: ExtractError,
}

/// Result of one extraction pass
#[derive(Debug, Default)]
pub struct Extraction {
    /// Candidates in file-name then line order
    pub candidates: Vec<CandidateRecord>,
    /// Files skipped because of recoverable errors
    pub skipped: Vec<SkippedFile>,
    /// Number of files read
    pub files_scanned: usize,
}

/// Marker extractor with precompiled patterns
#[derive(Debug, Clone)]
pub struct Extractor {
    patterns: MarkerPatterns,
}

impl Extractor {
    /// Create extractor
    ///
    /// # Errors
    /// [`ExtractError::Pattern`] if a marker pattern fails to compile.
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            patterns: MarkerPatterns::compile()?,
        })
    }

    /// Candidates found in `content`, attributed to `file`
    ///
    /// Markers with an empty description (`% TODO`, `% TODO BUG:`) are
    /// skipped.
    #[must_use]
    pub fn extract_from_content(
        &self,
        file: &str,
        content: &str,
        syntax: CommentSyntax,
    ) -> Vec<CandidateRecord> {
        content
            .lines()
            .zip(1u32..)
            .filter_map(|(line, number)| {
                let marker = self.patterns.find(syntax, line)?;
                let candidate = CandidateRecord::from_marker(file, number, marker);
                if candidate.text.is_empty() {
                    tracing::debug!("Skipping TODO without description at {}", candidate.identity);
                    return None;
                }
                tracing::debug!("Extracted TODO {} [{}]", candidate.identity, candidate.category);
                Some(candidate)
            })
            .collect()
    }

    /// Scan `dir` for files with an extension in `extensions`
    ///
    /// # Errors
    /// - [`ExtractError::MissingDirectory`] if `dir` is not a directory
    /// - [`ExtractError::NoExtensions`] if `extensions` is empty
    ///
    /// Per-file failures are collected in [`Extraction::skipped`].
    pub fn extract(&self, dir: &Path, extensions: &ExtensionSet) -> Result<Extraction, ExtractError> {
        if !dir.is_dir() {
            return Err(ExtractError::MissingDirectory(dir.to_path_buf()));
        }
        if extensions.is_empty() {
            return Err(ExtractError::NoExtensions);
        }

        tracing::debug!(
            "Scanning {} for extensions {:?}",
            dir.display(),
            extensions.as_slice()
        );

        let mut extraction = Extraction::default();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    extraction.skipped.push(SkippedFile {
                        error: ExtractError::Walk {
                            path: path.clone(),
                            message: e.to_string(),
                        },
                        path,
                    });
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(ext) = extensions.matches(path) else {
                continue;
            };
            let syntax = CommentSyntax::for_extension(ext);

            match std::fs::read_to_string(path) {
                Ok(content) => {
                    let file = path.to_string_lossy();
                    let found = self.extract_from_content(&file, &content, syntax);
                    tracing::debug!("Processed file: {}, found {} TODO(s)", file, found.len());
                    extraction.files_scanned += 1;
                    extraction.candidates.extend(found);
                }
                Err(e) => {
                    tracing::warn!("Failed to read file {}: {}", path.display(), e);
                    extraction.skipped.push(SkippedFile {
                        path: path.to_path_buf(),
                        error: ExtractError::io_error(path, e),
                    });
                }
            }
        }

        tracing::info!(
            "Total TODOs extracted: {} from {} file(s), {} skipped",
            extraction.candidates.len(),
            extraction.files_scanned,
            extraction.skipped.len()
        );
        Ok(extraction)
    }
}

/// One-shot extraction with a fresh [`Extractor`]
///
/// # Errors
/// See [`Extractor::extract`].
pub fn extract(dir: &Path, extensions: &ExtensionSet) -> Result<Extraction, ExtractError> {
    Extractor::new()?.extract(dir, extensions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extension_set_normalizes() {
        let set = ExtensionSet::parse(" .TEX, py ,.tex,, md");
        assert_eq!(set.as_slice(), &["tex", "py", "md"]);
        assert_eq!(set.matches(Path::new("a/b.Tex")), Some("tex"));
        assert_eq!(set.matches(Path::new("a/b.rs")), None);
        assert_eq!(set.matches(Path::new("Makefile")), None);
    }

    #[test]
    fn content_extraction_numbers_lines_from_one() {
        let extractor = Extractor::new().unwrap();
        let content = "\\section{Intro}\n% TODO BUG: fix X\ntext\n% TODO tighten bound\n";
        let found = extractor.extract_from_content("f.tex", content, CommentSyntax::Percent);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].identity.as_str(), "f.tex:2");
        assert_eq!(found[0].category.as_str(), "BUG");
        assert_eq!(found[0].text, "fix X");
        assert_eq!(found[1].identity.as_str(), "f.tex:4");
        assert!(found[1].category.is_uncategorized());
        assert_eq!(found[1].text, "tighten bound");
    }

    #[test]
    fn markers_without_description_are_skipped() {
        let extractor = Extractor::new().unwrap();
        let content = "% TODO\n% TODO   \n% TODO BUG:\n% TODO BUG: real one\n";
        let found = extractor.extract_from_content("f.tex", content, CommentSyntax::Percent);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].identity.as_str(), "f.tex:4");
        assert_eq!(found[0].text, "real one");
    }

    #[test]
    fn missing_directory_is_fatal() {
        let result = extract(Path::new("/definitely/not/here"), &ExtensionSet::parse("tex"));
        assert!(matches!(result, Err(ExtractError::MissingDirectory(_))));
    }

    #[test]
    fn empty_extension_set_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract(dir.path(), &ExtensionSet::parse(" , "));
        assert!(matches!(result, Err(ExtractError::NoExtensions)));
    }
}
