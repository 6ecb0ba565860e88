//! todosync Extraction Adapter
//!
//! Turns marked comment lines into candidate records:
//!
//! ```text
//! % TODO BUG: fix the proof     →  { id: "paper.tex:12", category: "BUG", text: "fix the proof" }
//! # TODO cache this             →  { id: "tool.py:4",    category: "UNCATEGORIZED", text: "cache this" }
//! ```
//!
//! The comment marker is chosen from the file extension; unknown extensions
//! accept any common marker.

#![warn(unreachable_pub)]

mod error;
mod scan;
mod syntax;

pub use error::ExtractError;
pub use scan::{extract, ExtensionSet, Extraction, Extractor, SkippedFile};
pub use syntax::{CommentSyntax, MarkerPatterns};
