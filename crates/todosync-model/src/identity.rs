//! Identity and category primitives
//!
//! Provides [`Identity`], the key that ties a candidate, its ledger record
//! and (through the ledger) its remote item together across runs, and
//! [`Category`], the normalized marker category.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Sentinel category for markers without a `CATEGORY:` prefix
pub const UNCATEGORIZED: &str = "UNCATEGORIZED";

/// Deterministic record identity: `file_path:line_number`
///
/// Two extraction passes over unchanged files yield identical identities.
/// Inserting a line above a marker changes the identity of every marker
/// below it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Build the identity of a marker at `line` (1-based) in `file`
    #[inline]
    #[must_use]
    pub fn from_location(file: &str, line: u32) -> Self {
        Self(format!("{file}:{line}"))
    }

    /// Wrap an already formatted identity
    #[inline]
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// String view
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Uppercased marker category
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Normalize a raw category: trimmed, uppercased, sentinel when empty
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::uncategorized()
        } else {
            Self(trimmed.to_uppercase())
        }
    }

    /// The `UNCATEGORIZED` sentinel
    #[inline]
    #[must_use]
    pub fn uncategorized() -> Self {
        Self(UNCATEGORIZED.to_string())
    }

    /// Whether this is the sentinel
    #[inline]
    #[must_use]
    pub fn is_uncategorized(&self) -> bool {
        self.0 == UNCATEGORIZED
    }

    /// String view
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::uncategorized()
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Marker text split into category and description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerText {
    /// Normalized category
    pub category: Category,
    /// Trimmed description
    pub text: String,
}

/// Split marker text on its first `:`
///
/// `"bug: fix X"` becomes (`BUG`, `fix X`); text without a colon keeps the
/// whole trimmed text and the sentinel category.
#[must_use]
pub fn split_marker(raw: &str) -> MarkerText {
    let raw = raw.trim();
    match raw.split_once(':') {
        Some((category, text)) => MarkerText {
            category: Category::normalize(category),
            text: text.trim().to_string(),
        },
        None => MarkerText {
            category: Category::uncategorized(),
            text: raw.to_string(),
        },
    }
}
